use super::*;
use crate::composition::dsl::ElementBuilder;

fn group(el: Element) -> GroupElement {
    match el {
        Element::Group(g) => g,
        other => panic!("expected group, got {}", other.kind_name()),
    }
}

fn image(id: &str, left: f64, top: f64, w: f64, h: f64) -> Element {
    ElementBuilder::image(id, "x.png")
        .at(left, top)
        .size(w, h)
        .build()
        .unwrap()
}

#[test]
fn fits_square_child_into_wide_group() {
    let g = group(
        ElementBuilder::group("g", vec![image("c", 0.0, 0.0, 400.0, 400.0)])
            .size(200.0, 100.0)
            .build()
            .unwrap(),
    );
    let out = layout_group(&g).unwrap();
    assert_eq!(out.scale, 0.25);
    assert_eq!((out.width, out.height), (200.0, 100.0));
    let b = out.elements[0].base();
    assert_eq!(b.width, Some(100.0));
    assert_eq!(b.height, Some(100.0));
}

#[test]
fn missing_group_size_uses_natural_bounds() {
    let g = group(
        ElementBuilder::group(
            "g",
            vec![
                image("a", 10.0, 20.0, 30.0, 40.0),
                image("b", 50.0, 0.0, 10.0, 10.0),
            ],
        )
        .build()
        .unwrap(),
    );
    let out = layout_group(&g).unwrap();
    assert_eq!((out.width, out.height), (60.0, 60.0));
    assert_eq!(out.scale, 1.0);
    assert_eq!(out.elements, g.elements);
}

#[test]
fn partial_explicit_size_takes_natural_on_other_axis() {
    let mut g = group(
        ElementBuilder::group("g", vec![image("a", 0.0, 0.0, 100.0, 50.0)])
            .build()
            .unwrap(),
    );
    g.base.width = Some(50.0);
    let out = layout_group(&g).unwrap();
    assert_eq!((out.width, out.height), (50.0, 50.0));
    assert_eq!(out.scale, 0.5);
}

#[test]
fn empty_group_keeps_explicit_box_and_unit_scale() {
    let g = group(ElementBuilder::group("g", vec![]).size(80.0, 30.0).build().unwrap());
    let out = layout_group(&g).unwrap();
    assert!(out.elements.is_empty());
    assert_eq!(out.scale, 1.0);
    assert_eq!((out.width, out.height), (80.0, 30.0));

    let g = group(ElementBuilder::group("g", vec![]).build().unwrap());
    let out = layout_group(&g).unwrap();
    assert_eq!((out.width, out.height, out.scale), (0.0, 0.0, 1.0));
}

#[test]
fn text_children_use_font_size_for_height_and_scale_font() {
    let text = ElementBuilder::text("t", "hi")
        .at(0.0, 0.0)
        .width(200.0)
        .font_size(40.0)
        .build()
        .unwrap();
    // natural = 200 x 60, group 100 x 100 -> scale 0.5
    let g = group(ElementBuilder::group("g", vec![text]).size(100.0, 100.0).build().unwrap());
    let out = layout_group(&g).unwrap();
    assert_eq!(out.scale, 0.5);
    let Element::Text(t) = &out.elements[0] else {
        panic!("expected text");
    };
    assert_eq!(t.font_size, 20.0);
    assert_eq!(t.base.width, Some(100.0));
    assert_eq!(t.base.height, None);
}

#[test]
fn degenerate_axis_does_not_constrain() {
    // All children have zero height: only the width axis constrains.
    let g = group(
        ElementBuilder::group("g", vec![image("a", 0.0, 0.0, 400.0, 0.0)])
            .size(100.0, 10.0)
            .build()
            .unwrap(),
    );
    assert_eq!(layout_group(&g).unwrap().scale, 0.25);
}

#[test]
fn nested_groups_are_laid_out_depth_first() {
    let inner = ElementBuilder::group("inner", vec![image("leaf", 0.0, 0.0, 200.0, 200.0)])
        .at(100.0, 0.0)
        .size(100.0, 100.0)
        .build()
        .unwrap();
    let outer = group(
        ElementBuilder::group("outer", vec![inner])
            .size(100.0, 50.0)
            .build()
            .unwrap(),
    );
    // inner: leaf scaled 0.5 -> 100x100. outer natural = 200 x 100 -> scale 0.5.
    let out = layout_group(&outer).unwrap();
    assert_eq!(out.scale, 0.5);
    let Element::Group(inner) = &out.elements[0] else {
        panic!("expected group");
    };
    assert_eq!(inner.base.left, 50.0);
    assert_eq!(inner.base.width, Some(50.0));
    assert_eq!(inner.base.height, Some(50.0));
    assert_eq!(inner.elements[0].base().width, Some(50.0));
    assert_eq!(inner.elements[0].base().height, Some(50.0));
}

#[test]
fn nesting_beyond_limit_fails() {
    let mut el = image("leaf", 0.0, 0.0, 1.0, 1.0);
    for i in 0..4 {
        el = ElementBuilder::group(format!("g{i}"), vec![el]).build().unwrap();
    }
    let g = group(el);
    let opts = LayoutOpts {
        max_depth: 3,
        ..LayoutOpts::default()
    };
    let err = layout_group_with(&g, &opts).unwrap_err();
    assert!(matches!(err, StoryboardError::NestingTooDeep { max_depth: 3, .. }));
    let opts = LayoutOpts {
        max_depth: 4,
        ..LayoutOpts::default()
    };
    layout_group_with(&g, &opts).unwrap();
}

#[test]
fn scaled_children_never_exceed_group_bounds() {
    // Small deterministic LCG so the grid of layouts is reproducible.
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut next = move |max: f64| {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * max
    };

    for case in 0..200 {
        let n = 1 + (next(5.0) as usize);
        let mut children = Vec::new();
        for i in 0..n {
            if i % 3 == 2 {
                children.push(
                    ElementBuilder::text(format!("t{i}"), "x")
                        .at(next(500.0), next(500.0))
                        .width(next(300.0))
                        .font_size(1.0 + next(80.0))
                        .build()
                        .unwrap(),
                );
            } else {
                children.push(image(&format!("i{i}"), next(500.0), next(500.0), next(600.0), next(600.0)));
            }
        }
        let gw = 1.0 + next(1000.0);
        let gh = 1.0 + next(1000.0);
        let g = group(ElementBuilder::group("g", children).size(gw, gh).build().unwrap());
        let out = layout_group(&g).unwrap();
        for child in &out.elements {
            let (r, b) = extent(child, DEFAULT_TEXT_LINE_HEIGHT);
            assert!(r <= gw + 1e-9, "case {case}: right {r} > {gw}");
            assert!(b <= gh + 1e-9, "case {case}: bottom {b} > {gh}");
        }
    }
}
