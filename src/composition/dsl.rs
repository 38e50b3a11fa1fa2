use crate::{
    composition::model::{
        Animation, Audio, Composition, Element, ElementBase, FontWeight, GroupElement,
        ImageElement, Page, TextAlign, TextElement, VideoElement,
    },
    eval::time::TimeValue,
    foundation::core::Fps,
    foundation::error::{StoryboardError, StoryboardResult},
};

/// Builder for [`Composition`](crate::Composition).
pub struct CompositionBuilder {
    fps: Fps,
    width: u32,
    height: u32,
    pages: Vec<Page>,
    audios: Vec<Audio>,
}

impl CompositionBuilder {
    /// Create a builder for a new composition.
    pub fn new(fps: Fps, width: u32, height: u32) -> Self {
        Self {
            fps,
            width,
            height,
            pages: Vec::new(),
            audios: Vec::new(),
        }
    }

    /// Append a page.
    pub fn page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Append a root audio track.
    pub fn audio(mut self, audio: Audio) -> Self {
        self.audios.push(audio);
        self
    }

    /// Build and validate final [`Composition`](crate::Composition).
    pub fn build(self) -> StoryboardResult<Composition> {
        let comp = Composition {
            pages: self.pages,
            fps: self.fps,
            width: self.width,
            height: self.height,
            audios: self.audios,
        };
        comp.validate()?;
        Ok(comp)
    }
}

/// Builder for [`Page`](crate::Page) values.
pub struct PageBuilder {
    id: String,
    name: String,
    duration: i64,
    background_color: String,
    elements: Vec<Element>,
}

impl PageBuilder {
    /// Create a page builder with required `id` and `duration` (frames).
    pub fn new(id: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration,
            background_color: "#ffffff".to_string(),
            elements: Vec::new(),
        }
    }

    /// Set display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set background color.
    pub fn background(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    /// Append an element.
    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Build the page.
    pub fn build(self) -> Page {
        Page {
            id: self.id,
            name: self.name,
            duration: self.duration,
            background_color: self.background_color,
            elements: self.elements,
        }
    }
}

/// Builder for [`Element`](crate::Element) values.
pub struct ElementBuilder {
    element: Element,
    font_size_on_non_text: bool,
}

impl ElementBuilder {
    fn from_element(element: Element) -> Self {
        Self {
            element,
            font_size_on_non_text: false,
        }
    }

    fn base(id: impl Into<String>) -> ElementBase {
        ElementBase {
            id: id.into(),
            ..ElementBase::default()
        }
    }

    /// Text element with default font settings.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_element(Element::Text(TextElement {
            base: Self::base(id),
            text: text.into(),
            font_size: 48.0,
            font_family: "Inter".to_string(),
            color: "#000000".to_string(),
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
        }))
    }

    /// Image element.
    pub fn image(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self::from_element(Element::Image(ImageElement {
            base: Self::base(id),
            src: src.into(),
        }))
    }

    /// Video element with default audio/playback controls.
    pub fn video(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self::from_element(Element::Video(VideoElement {
            base: Self::base(id),
            src: src.into(),
            muted: false,
            volume: 1.0,
            playback_rate: 1.0,
            looping: false,
        }))
    }

    /// Group element wrapping `children`.
    pub fn group(id: impl Into<String>, children: Vec<Element>) -> Self {
        Self::from_element(Element::Group(GroupElement {
            base: Self::base(id),
            elements: children,
        }))
    }

    /// Set `left`/`top`.
    pub fn at(mut self, left: f64, top: f64) -> Self {
        let base = self.element.base_mut();
        base.left = left;
        base.top = top;
        self
    }

    /// Set explicit `width`/`height`.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        let base = self.element.base_mut();
        base.width = Some(width);
        base.height = Some(height);
        self
    }

    /// Set explicit `width` only.
    pub fn width(mut self, width: f64) -> Self {
        self.element.base_mut().width = Some(width);
        self
    }

    /// Set rotation in degrees.
    pub fn rotation(mut self, degrees: f64) -> Self {
        self.element.base_mut().rotation = degrees;
        self
    }

    /// Set opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.element.base_mut().opacity = opacity;
        self
    }

    /// Set stacking order.
    pub fn z_index(mut self, z: i32) -> Self {
        self.element.base_mut().z_index = z;
        self
    }

    /// Set visibility delay.
    pub fn delay(mut self, delay: impl Into<TimeValue>) -> Self {
        self.element.base_mut().delay = delay.into();
        self
    }

    /// Attach an animation.
    pub fn animation(mut self, animation: Animation) -> Self {
        self.element.base_mut().animation = Some(animation);
        self
    }

    /// Set text font size. Only valid for text elements.
    pub fn font_size(mut self, size: f64) -> Self {
        match &mut self.element {
            Element::Text(t) => t.font_size = size,
            Element::Image(_) | Element::Video(_) | Element::Group(_) => {
                self.font_size_on_non_text = true;
            }
        }
        self
    }

    /// Build the element.
    pub fn build(self) -> StoryboardResult<Element> {
        if self.font_size_on_non_text {
            return Err(StoryboardError::validation(format!(
                "font_size set on {} element '{}'",
                self.element.kind_name(),
                self.element.id()
            )));
        }
        Ok(self.element)
    }
}

/// Create an audio track with default volume/playback controls.
pub fn audio(id: impl Into<String>, src: impl Into<String>) -> Audio {
    Audio {
        id: id.into(),
        src: src.into(),
        delay: TimeValue::default(),
        duration: None,
        volume: 1.0,
        muted: false,
        looping: false,
        trim_before: None,
        trim_after: None,
        playback_rate: 1.0,
        tone_frequency: 1.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/dsl.rs"]
mod tests;
