use super::*;

#[test]
fn builders_create_expected_structure() {
    let title = ElementBuilder::text("title", "Hello")
        .at(10.0, 20.0)
        .font_size(32.0)
        .delay("1s")
        .build()
        .unwrap();
    let logo = ElementBuilder::image("logo", "logo.png")
        .size(100.0, 40.0)
        .z_index(2)
        .build()
        .unwrap();
    let group = ElementBuilder::group("g", vec![logo])
        .size(50.0, 20.0)
        .build()
        .unwrap();

    let comp = CompositionBuilder::new(Fps(30), 640, 360)
        .page(
            PageBuilder::new("p1", 60)
                .name("Intro")
                .background("#222")
                .element(title)
                .element(group)
                .build(),
        )
        .audio(audio("music", "song.mp3"))
        .build()
        .unwrap();

    assert_eq!(comp.pages.len(), 1);
    assert_eq!(comp.pages[0].elements.len(), 2);
    assert_eq!(comp.pages[0].background_color, "#222");
    let Element::Text(t) = &comp.pages[0].elements[0] else {
        panic!("expected text");
    };
    assert_eq!(t.font_size, 32.0);
    assert_eq!(t.base.delay, TimeValue::Text("1s".into()));
    assert_eq!(comp.pages[0].find_element("logo").unwrap().base().z_index, 2);
}

#[test]
fn font_size_on_image_is_rejected() {
    assert!(ElementBuilder::image("i", "x.png").font_size(10.0).build().is_err());
}

#[test]
fn build_validates_duplicate_ids() {
    let a = ElementBuilder::text("same", "a").build().unwrap();
    let b = ElementBuilder::text("same", "b").build().unwrap();
    let res = CompositionBuilder::new(Fps(30), 10, 10)
        .page(PageBuilder::new("p", 10).element(a).element(b).build())
        .build();
    assert!(res.is_err());
}
