//! Scene serialization to SVG.
//!
//! This is both the user-facing vector export and the intermediate
//! representation the rasterizer feeds to resvg, so paint order and
//! geometry here define the visual output of every format.

use std::collections::HashMap;
use std::fmt::Write;

use editor_core::{Element, ElementId, ElementKind, Scene, ShapeKind, StrokeStyle, TextAlign};

use crate::assets::preserve_aspect_ratio;
use crate::options::{Background, ExportOptions};

/// Per-element image overrides used by the rasterizer.
///
/// `Some(href)` substitutes a processed data URI for the element's raw
/// `src`; `None` marks the element as skipped (unloadable source).
pub(crate) type ResolvedImages = HashMap<ElementId, Option<String>>;

/// Serialize a scene to an SVG document string.
#[must_use]
pub fn render_svg(scene: &Scene, options: &ExportOptions) -> String {
    render_svg_resolved(scene, options, None)
}

/// Serialize with image hrefs resolved/skipped by the rasterizer.
pub(crate) fn render_svg_resolved(
    scene: &Scene,
    options: &ExportOptions,
    resolved: Option<&ResolvedImages>,
) -> String {
    let width = scene.canvas_width;
    let height = scene.canvas_height;

    let mut svg = String::with_capacity(4096);
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );

    let ordered = scene.paint_order();

    write_shadow_defs(&mut svg, &ordered);

    if options.background == Background::White {
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");
    }

    for element in &ordered {
        if !element.visible {
            continue;
        }
        write_element(&mut svg, element, options, resolved);
    }

    svg.push_str("</svg>");
    svg
}

/// Emit one `feDropShadow` filter per shadowed shape, ahead of first use.
fn write_shadow_defs(svg: &mut String, ordered: &[&Element]) {
    let shadowed: Vec<&Element> = ordered
        .iter()
        .copied()
        .filter(|e| {
            matches!(
                &e.kind,
                ElementKind::Shape {
                    shadow: Some(_),
                    ..
                }
            )
        })
        .collect();
    if shadowed.is_empty() {
        return;
    }

    svg.push_str("<defs>");
    for element in shadowed {
        if let ElementKind::Shape {
            shadow: Some(shadow),
            ..
        } = &element.kind
        {
            let _ = write!(
                svg,
                "<filter id=\"shadow-{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\">\
                 <feDropShadow dx=\"{dx}\" dy=\"{dy}\" stdDeviation=\"{blur}\" flood-color=\"{color}\"/>\
                 </filter>",
                id = element.id,
                dx = shadow.offset_x,
                dy = shadow.offset_y,
                blur = shadow.blur,
                color = escape_xml(&shadow.color),
            );
        }
    }
    svg.push_str("</defs>");
}

fn write_element(
    svg: &mut String,
    element: &Element,
    options: &ExportOptions,
    resolved: Option<&ResolvedImages>,
) {
    let t = &element.transform;
    // Rotation is about the box center so raster and vector output agree
    // with the on-screen CSS transform.
    let _ = write!(
        svg,
        "<g transform=\"translate({x},{y}) rotate({rot},{cx},{cy})\" opacity=\"{opacity}\">",
        x = t.x,
        y = t.y,
        rot = t.rotation,
        cx = t.width / 2.0,
        cy = t.height / 2.0,
        opacity = element.opacity,
    );

    match &element.kind {
        ElementKind::Shape { .. } => write_shape(svg, element),
        ElementKind::Text { .. } => write_text(svg, element, options.flatten_text),
        ElementKind::Image { .. } => write_image(svg, element, resolved),
    }

    svg.push_str("</g>");
}

fn write_shape(svg: &mut String, element: &Element) {
    let ElementKind::Shape {
        shape,
        fill,
        stroke,
        stroke_width,
        stroke_style,
        border_radius,
        shadow,
    } = &element.kind
    else {
        return;
    };
    let t = &element.transform;

    let mut paint = format!("fill=\"{}\"", escape_xml(fill));
    if let Some(stroke) = stroke {
        let _ = write!(
            paint,
            " stroke=\"{}\" stroke-width=\"{stroke_width}\"",
            escape_xml(stroke)
        );
        match stroke_style {
            StrokeStyle::Solid => {}
            StrokeStyle::Dashed => {
                let _ = write!(
                    paint,
                    " stroke-dasharray=\"{},{}\"",
                    stroke_width * 3.0,
                    stroke_width * 1.5
                );
            }
            StrokeStyle::Dotted => {
                let _ = write!(paint, " stroke-dasharray=\"{stroke_width},{stroke_width}\"");
            }
        }
    }
    if shadow.is_some() {
        let _ = write!(paint, " filter=\"url(#shadow-{})\"", element.id);
    }

    match shape {
        ShapeKind::Rectangle => {
            let _ = write!(
                svg,
                "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" rx=\"{border_radius}\" {paint}/>",
                w = t.width,
                h = t.height,
            );
        }
        ShapeKind::Circle => {
            let radius = t.width.min(t.height) / 2.0;
            let _ = write!(
                svg,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" {paint}/>",
                cx = t.width / 2.0,
                cy = t.height / 2.0,
            );
        }
        ShapeKind::Triangle => {
            let _ = write!(
                svg,
                "<polygon points=\"{half},0 {w},{h} 0,{h}\" {paint}/>",
                half = t.width / 2.0,
                w = t.width,
                h = t.height,
            );
        }
    }
}

fn write_text(svg: &mut String, element: &Element, flatten: bool) {
    let ElementKind::Text {
        content,
        font_size,
        font_family,
        font_weight,
        color,
        text_align,
        line_height,
        letter_spacing,
        text_transform,
        background_color,
    } = &element.kind
    else {
        return;
    };
    let t = &element.transform;

    if let Some(background) = background_color {
        let _ = write!(
            svg,
            "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\"/>",
            w = t.width,
            h = t.height,
            fill = escape_xml(background),
        );
    }

    let transformed = apply_text_transform(content, *text_transform);

    if flatten {
        // Text-to-path conversion needs font outline access and is not
        // implemented; leave an explicit marker rather than wrong output.
        let _ = write!(
            svg,
            "<!-- flatten-text not implemented: {} -->",
            escape_xml(&transformed)
        );
        return;
    }

    let (x, anchor) = match text_align {
        TextAlign::Left | TextAlign::Justify => (0.0, "start"),
        TextAlign::Center => (t.width / 2.0, "middle"),
        TextAlign::Right => (t.width, "end"),
    };

    let _ = write!(
        svg,
        "<text x=\"{x}\" y=\"{font_size}\" font-family=\"{family}\" font-size=\"{font_size}\" \
         font-weight=\"{font_weight}\" fill=\"{fill}\" text-anchor=\"{anchor}\"",
        family = escape_xml(font_family),
        fill = escape_xml(color),
    );
    if letter_spacing.abs() > f32::EPSILON {
        let _ = write!(svg, " letter-spacing=\"{letter_spacing}\"");
    }
    svg.push('>');

    let line_step = font_size * line_height;
    for (index, line) in transformed.split('\n').enumerate() {
        if index == 0 {
            let _ = write!(svg, "<tspan x=\"{x}\">{}</tspan>", escape_xml(line));
        } else {
            let _ = write!(
                svg,
                "<tspan x=\"{x}\" dy=\"{line_step}\">{}</tspan>",
                escape_xml(line)
            );
        }
    }
    svg.push_str("</text>");
}

fn write_image(svg: &mut String, element: &Element, resolved: Option<&ResolvedImages>) {
    let ElementKind::Image {
        src, object_fit, ..
    } = &element.kind
    else {
        return;
    };
    let t = &element.transform;

    let href = match resolved.and_then(|map| map.get(&element.id)) {
        // Source could not be loaded; the element is skipped.
        Some(None) => return,
        Some(Some(processed)) => processed.clone(),
        None => src.clone(),
    };

    let _ = write!(
        svg,
        "<image x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" href=\"{href}\" \
         preserveAspectRatio=\"{par}\"/>",
        w = t.width,
        h = t.height,
        href = escape_xml(&href),
        par = preserve_aspect_ratio(*object_fit),
    );
}

fn apply_text_transform(content: &str, transform: editor_core::TextTransform) -> String {
    use editor_core::TextTransform;
    match transform {
        TextTransform::None => content.to_string(),
        TextTransform::Uppercase => content.to_uppercase(),
        TextTransform::Lowercase => content.to_lowercase(),
        TextTransform::Capitalize => content
            .split_inclusive(char::is_whitespace)
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect(),
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::{
        Element, ObjectFit, Shadow, TextTransform, Transform,
    };

    fn text_element(content: &str) -> Element {
        Element::new(ElementKind::Text {
            content: content.to_string(),
            font_size: 16.0,
            font_family: "Arial".to_string(),
            font_weight: 400,
            color: "#000000".to_string(),
            text_align: TextAlign::Left,
            line_height: 1.2,
            letter_spacing: 0.0,
            text_transform: TextTransform::None,
            background_color: None,
        })
        .with_transform(Transform {
            width: 200.0,
            height: 30.0,
            ..Transform::default()
        })
    }

    fn rect_element(fill: &str, z_index: i32) -> Element {
        Element::new(ElementKind::Shape {
            shape: ShapeKind::Rectangle,
            fill: fill.to_string(),
            stroke: None,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::Solid,
            border_radius: 0.0,
            shadow: None,
        })
        .with_transform(Transform {
            z_index,
            ..Transform::default()
        })
    }

    #[test]
    fn test_empty_scene_header() {
        let scene = Scene::new(800.0, 600.0);
        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_background_modes() {
        let scene = Scene::new(100.0, 100.0);

        let white = render_svg(&scene, &ExportOptions::default());
        assert!(white.contains("fill=\"#ffffff\""));

        let transparent = render_svg(
            &scene,
            &ExportOptions {
                background: Background::Transparent,
                ..ExportOptions::default()
            },
        );
        assert!(!transparent.contains("fill=\"#ffffff\""));
    }

    #[test]
    fn test_paint_order_in_output() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(rect_element("#top000", 10));
        scene.add_element(rect_element("#bottom", 1));

        let svg = render_svg(&scene, &ExportOptions::default());
        let top = svg.find("#top000").expect("top element");
        let bottom = svg.find("#bottom").expect("bottom element");
        // Lower z-index is emitted (painted) first.
        assert!(bottom < top);
    }

    #[test]
    fn test_hidden_element_omitted() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut hidden = rect_element("#facade", 0);
        hidden.visible = false;
        scene.add_element(hidden);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(!svg.contains("#facade"));
    }

    #[test]
    fn test_shapes_emit_native_primitives() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(rect_element("#111111", 0));

        let mut circle = rect_element("#222222", 1);
        if let ElementKind::Shape { shape, .. } = &mut circle.kind {
            *shape = ShapeKind::Circle;
        }
        scene.add_element(circle);

        let mut triangle = rect_element("#333333", 2);
        if let ElementKind::Shape { shape, .. } = &mut triangle.kind {
            *shape = ShapeKind::Triangle;
        }
        scene.add_element(triangle);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("<rect x=\"0\" y=\"0\""));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_stroke_styles() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut dashed = rect_element("#111111", 0);
        if let ElementKind::Shape {
            stroke,
            stroke_width,
            stroke_style,
            ..
        } = &mut dashed.kind
        {
            *stroke = Some("#000000".to_string());
            *stroke_width = 2.0;
            *stroke_style = StrokeStyle::Dashed;
        }
        scene.add_element(dashed);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("stroke=\"#000000\""));
        assert!(svg.contains("stroke-dasharray=\"6,3\""));
    }

    #[test]
    fn test_shadow_filter_emitted() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut shadowed = rect_element("#111111", 0);
        if let ElementKind::Shape { shadow, .. } = &mut shadowed.kind {
            *shadow = Some(Shadow {
                offset_x: 2.0,
                offset_y: 3.0,
                blur: 4.0,
                color: "#00000080".to_string(),
            });
        }
        let id = shadowed.id;
        scene.add_element(shadowed);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("feDropShadow"));
        assert!(svg.contains(&format!("url(#shadow-{id})")));
    }

    #[test]
    fn test_text_multiline_and_alignment() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut text = text_element("line one\nline two");
        if let ElementKind::Text { text_align, .. } = &mut text.kind {
            *text_align = TextAlign::Center;
        }
        scene.add_element(text);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("<tspan x=\"100\">line one</tspan>"));
        assert!(svg.contains("dy=\"19.2\""));
        assert!(svg.contains("line two"));
    }

    #[test]
    fn test_text_transform_uppercase() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut text = text_element("shout this");
        if let ElementKind::Text { text_transform, .. } = &mut text.kind {
            *text_transform = TextTransform::Uppercase;
        }
        scene.add_element(text);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("SHOUT THIS"));
    }

    #[test]
    fn test_xml_escaping() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(text_element("A < B & C > \"D\""));

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("A &lt; B &amp; C &gt; &quot;D&quot;"));
    }

    #[test]
    fn test_flatten_text_placeholder() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(text_element("outline me"));

        let svg = render_svg(
            &scene,
            &ExportOptions {
                flatten_text: true,
                ..ExportOptions::default()
            },
        );
        assert!(svg.contains("<!-- flatten-text not implemented: outline me -->"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_image_href_and_fit() {
        let mut scene = Scene::new(400.0, 300.0);
        scene.add_element(Element::new(ElementKind::Image {
            src: "photo.png".to_string(),
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            object_fit: ObjectFit::Contain,
        }));

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("href=\"photo.png\""));
        assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
    }

    #[test]
    fn test_resolved_image_skip_and_substitute() {
        let mut scene = Scene::new(400.0, 300.0);
        let skipped = scene.add_element(Element::new(ElementKind::Image {
            src: "broken.png".to_string(),
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            object_fit: ObjectFit::Cover,
        }));
        let replaced = scene.add_element(Element::new(ElementKind::Image {
            src: "photo.png".to_string(),
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            object_fit: ObjectFit::Cover,
        }));

        let mut resolved = ResolvedImages::new();
        resolved.insert(skipped, None);
        resolved.insert(replaced, Some("data:image/png;base64,AAAA".to_string()));

        let svg = render_svg_resolved(&scene, &ExportOptions::default(), Some(&resolved));
        assert!(!svg.contains("broken.png"));
        assert!(!svg.contains("photo.png"));
        assert!(svg.contains("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_rotation_about_center() {
        let mut scene = Scene::new(400.0, 300.0);
        let mut rotated = rect_element("#111111", 0);
        rotated.transform.rotation = 45.0;
        scene.add_element(rotated);

        let svg = render_svg(&scene, &ExportOptions::default());
        assert!(svg.contains("rotate(45,50,50)"));
    }
}
