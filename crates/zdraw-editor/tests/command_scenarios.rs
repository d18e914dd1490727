//! 端到端命令场景：通过 Editor 送入输入事件，检查文档、Jig 和拾取集

use approx::assert_abs_diff_eq;
use std::cell::Cell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;
use zdraw_core::drawable::Composite;
use zdraw_core::entity::EntityId;
use zdraw_core::geometry::{Circle, Geometry, Line};
use zdraw_core::math::{BoundingBox2, Point2, Vector2};
use zdraw_core::transform::Transform2D;
use zdraw_editor::{CommandState, Editor, InputEvent, JigEvent, Settings};

fn click(editor: &mut Editor, x: f64, y: f64) -> CommandState {
    editor.handle_event(InputEvent::Click(Point2::new(x, y)))
}

fn hover(editor: &mut Editor, x: f64, y: f64) -> CommandState {
    editor.handle_event(InputEvent::PointerMove(Point2::new(x, y)))
}

fn type_text(editor: &mut Editor, text: &str) -> CommandState {
    editor.handle_event(InputEvent::Text(text.to_string()))
}

fn add(editor: &Editor, geometry: Geometry) -> EntityId {
    editor.context().document.borrow_mut().add(geometry)
}

fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
}

fn geometry(editor: &Editor, id: EntityId) -> Geometry {
    editor
        .document()
        .get(id)
        .map(|e| e.geometry.clone())
        .expect("entity exists")
}

fn last_geometry(editor: &Editor) -> Geometry {
    editor
        .document()
        .entities()
        .last()
        .map(|e| e.geometry.clone())
        .expect("document is not empty")
}

fn assert_line(geometry: &Geometry, start: (f64, f64), end: (f64, f64)) {
    let Geometry::Line(line) = geometry else {
        panic!("expected a line, got {:?}", geometry);
    };
    assert_abs_diff_eq!(line.start.x, start.0, epsilon = 1e-9);
    assert_abs_diff_eq!(line.start.y, start.1, epsilon = 1e-9);
    assert_abs_diff_eq!(line.end.x, end.0, epsilon = 1e-9);
    assert_abs_diff_eq!(line.end.y, end.1, epsilon = 1e-9);
}

fn transformed(geometries: &[Geometry], transform: &Transform2D) -> Vec<Geometry> {
    geometries
        .iter()
        .map(|g| {
            let mut g = g.clone();
            g.transform(transform);
            g
        })
        .collect()
}

fn extents_of(geometries: &[Geometry]) -> BoundingBox2 {
    let mut bbox = BoundingBox2::empty();
    for g in geometries {
        bbox.add_box(&g.bounding_box());
    }
    bbox
}

/// Jig 里变换预览（组合体）当前的几何
fn preview_geometries(editor: &Editor) -> Vec<Geometry> {
    let mut geometries = Vec::new();
    for item in editor.context().jig.items() {
        let item = item.borrow();
        if let Some(composite) = item.as_any().downcast_ref::<Composite>() {
            geometries.extend(composite.iter().filter_map(|d| d.to_geometry()));
        }
    }
    geometries
}

fn assert_geometries_close(actual: &[Geometry], expected: &[Geometry]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        match (a, e) {
            (Geometry::Line(_), Geometry::Line(line)) => {
                assert_line(a, (line.start.x, line.start.y), (line.end.x, line.end.y));
            }
            (Geometry::Circle(a), Geometry::Circle(e)) => {
                assert_abs_diff_eq!(a.center.x, e.center.x, epsilon = 1e-9);
                assert_abs_diff_eq!(a.center.y, e.center.y, epsilon = 1e-9);
                assert_abs_diff_eq!(a.radius, e.radius, epsilon = 1e-9);
            }
            _ => panic!("expected {:?}, got {:?}", e, a),
        }
    }
}

fn assert_extents_close(actual: &BoundingBox2, expected: &BoundingBox2) {
    assert_abs_diff_eq!(actual.min.x, expected.min.x, epsilon = 1e-9);
    assert_abs_diff_eq!(actual.min.y, expected.min.y, epsilon = 1e-9);
    assert_abs_diff_eq!(actual.max.x, expected.max.x, epsilon = 1e-9);
    assert_abs_diff_eq!(actual.max.y, expected.max.y, epsilon = 1e-9);
}

/// 选中一组图元并启动命令，返回图元 id
fn start_on(editor: &mut Editor, command: &str, source: &[Geometry]) -> Vec<EntityId> {
    let ids: Vec<EntityId> = source.iter().map(|g| add(editor, g.clone())).collect();
    editor.handle_event(InputEvent::Pick(ids.clone()));
    editor.run_command(command).unwrap();
    ids
}

/// 绕 `center` 在半径 1 到 `radius` 之间来回移动指针
fn wander(editor: &mut Editor, center: (f64, f64), radius: f64) {
    for i in 0..1000 {
        let t = i as f64 * 0.37;
        let r = 1.0 + (radius - 1.0) * (0.5 + 0.5 * (t * 0.13).sin());
        hover(editor, center.0 + r * t.cos(), center.1 + r * t.sin());
    }
}

fn assert_idle(editor: &Editor) {
    assert!(!editor.is_busy());
    assert!(editor.context().jig.is_empty());
    assert!(!editor.context().input.is_waiting());
}

#[test]
fn polyline_close_commits_closed_polyline() {
    let mut editor = Editor::default();
    editor.run_command("POLYLINE").unwrap();
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 1.0, 0.0);
    hover(&mut editor, 1.0, 0.5);
    click(&mut editor, 1.0, 1.0);
    assert!(editor.prompt().contains("[Close/Undo/End] <End>"));

    assert_eq!(type_text(&mut editor, "c"), CommandState::Committed);
    let Geometry::Polyline(polyline) = last_geometry(&editor) else {
        panic!("expected a polyline");
    };
    assert!(polyline.closed);
    assert_eq!(
        polyline.points(),
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0)
        ]
    );
    assert_idle(&editor);
}

#[test]
fn polyline_end_with_single_point_cancels() {
    let mut editor = Editor::default();
    editor.run_command("PL").unwrap();
    click(&mut editor, 0.0, 0.0);
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Cancelled);
    assert!(editor.document().is_empty());
    assert_idle(&editor);
}

#[test]
fn polyline_undo_drops_last_vertex() {
    let mut editor = Editor::default();
    editor.run_command("PLINE").unwrap();
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 1.0, 0.0);
    click(&mut editor, 5.0, 5.0);
    type_text(&mut editor, "u");
    click(&mut editor, 1.0, 1.0);
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);

    let Geometry::Polyline(polyline) = last_geometry(&editor) else {
        panic!("expected a polyline");
    };
    assert!(!polyline.closed);
    assert_eq!(polyline.vertex_count(), 3);
    assert_eq!(polyline.points()[2], Point2::new(1.0, 1.0));
}

#[test]
fn line_cancelled_at_second_request_leaves_nothing() {
    let mut editor = Editor::default();
    editor.run_command("LINE").unwrap();
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 4.0, 4.0);
    assert_eq!(editor.context().jig.len(), 1);

    assert_eq!(editor.cancel(), CommandState::Cancelled);
    assert!(editor.document().is_empty());
    assert_idle(&editor);
}

#[test]
fn circle_with_diameter_keyword() {
    let mut editor = Editor::default();
    editor.run_command("C").unwrap();
    click(&mut editor, 2.0, 2.0);
    hover(&mut editor, 5.0, 6.0);
    assert_abs_diff_eq!(editor.context().jig.extents().width(), 10.0, epsilon = 1e-9);

    type_text(&mut editor, "d");
    assert_eq!(type_text(&mut editor, "10"), CommandState::Committed);
    assert_eq!(
        last_geometry(&editor),
        Geometry::Circle(Circle::new(Point2::new(2.0, 2.0), 5.0))
    );
    assert_idle(&editor);
}

#[test]
fn arc_through_three_points() {
    let mut editor = Editor::default();
    editor.run_command("ARC").unwrap();
    click(&mut editor, 1.0, 0.0);
    click(&mut editor, 0.0, 1.0);
    hover(&mut editor, -1.0, 0.1);
    assert_eq!(click(&mut editor, -1.0, 0.0), CommandState::Committed);

    let Geometry::Arc(arc) = last_geometry(&editor) else {
        panic!("expected an arc");
    };
    assert_abs_diff_eq!(arc.center.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(arc.center.y, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(arc.radius, 1.0, epsilon = 1e-9);
    assert_idle(&editor);
}

#[test]
fn rectangle_from_typed_corner() {
    let mut editor = Editor::default();
    editor.run_command("REC").unwrap();
    click(&mut editor, 1.0, 1.0);
    assert_eq!(type_text(&mut editor, "@4,3"), CommandState::Committed);

    let Geometry::Polyline(rect) = last_geometry(&editor) else {
        panic!("expected a polyline");
    };
    assert!(rect.closed);
    assert_eq!(rect.vertex_count(), 4);
    let extents = editor.document().extents();
    assert_eq!(extents.max, Point2::new(5.0, 4.0));
}

#[test]
fn text_with_default_height_and_rotation() {
    let settings = Settings {
        text_height: 3.5,
        ..Settings::default()
    };
    let mut editor = Editor::new(settings);
    editor.run_command("TEXT").unwrap();
    click(&mut editor, 0.0, 0.0);
    editor.handle_event(InputEvent::Enter);
    editor.handle_event(InputEvent::Enter);
    assert_eq!(type_text(&mut editor, "Hello"), CommandState::Committed);

    let Geometry::Text(text) = last_geometry(&editor) else {
        panic!("expected text");
    };
    assert_eq!(text.content, "Hello");
    assert_eq!(text.height, 3.5);
    assert_eq!(text.rotation, 0.0);
}

#[test]
fn hatch_uses_default_pattern() {
    let mut editor = Editor::default();
    editor.run_command("HATCH").unwrap();
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 4.0, 0.0);
    click(&mut editor, 4.0, 3.0);
    editor.handle_event(InputEvent::Enter);
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);

    let Geometry::Hatch(hatch) = last_geometry(&editor) else {
        panic!("expected a hatch");
    };
    assert_eq!(hatch.pattern, "ANSI31");
    assert_abs_diff_eq!(hatch.area(), 6.0, epsilon = 1e-9);
}

#[test]
fn move_applies_single_translation() {
    let mut editor = Editor::default();
    let id = add(&editor, line(0.0, 0.0, 1.0, 0.0));
    let changes = Rc::new(Cell::new(0));
    let sink = changes.clone();
    editor.context().jig.subscribe(move |e| {
        if *e == JigEvent::Changed {
            sink.set(sink.get() + 1);
        }
    });

    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("MOVE").unwrap();
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 2.0, 2.0);
    hover(&mut editor, 5.0, 5.0);
    assert_eq!(changes.get(), 2);
    // 预览期间原对象不动
    assert_line(&geometry(&editor, id), (0.0, 0.0), (1.0, 0.0));

    assert_eq!(click(&mut editor, 5.0, 5.0), CommandState::Committed);
    assert_line(&geometry(&editor, id), (5.0, 5.0), (6.0, 5.0));
    assert_eq!(editor.document().len(), 1);
    assert_idle(&editor);
}

#[test]
fn move_cancelled_keeps_original() {
    let mut editor = Editor::default();
    let id = add(&editor, line(0.0, 0.0, 1.0, 0.0));
    editor.run_command("M").unwrap();
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.handle_event(InputEvent::Enter);
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 3.0, 3.0);
    assert_eq!(editor.cancel(), CommandState::Cancelled);
    assert_line(&geometry(&editor, id), (0.0, 0.0), (1.0, 0.0));
    assert_idle(&editor);
}

#[test]
fn move_preview_tracks_pointer_after_many_ticks() {
    let mut editor = Editor::default();
    let id = add(&editor, line(0.0, 0.0, 1.0, 0.0));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("MOVE").unwrap();
    click(&mut editor, 0.0, 0.0);

    for i in 0..1000 {
        let t = i as f64 * 0.37;
        hover(&mut editor, 50.0 * t.sin(), 50.0 * t.cos());
    }
    hover(&mut editor, 5.0, 5.0);

    // 预览中的副本（组合体）加上基点到指针的橡皮筋线
    let extents = editor.context().jig.extents();
    assert_abs_diff_eq!(extents.max.x, 6.0, epsilon = 1e-9);
    assert_abs_diff_eq!(extents.max.y, 5.0, epsilon = 1e-9);

    click(&mut editor, 5.0, 5.0);
    assert_line(&geometry(&editor, id), (5.0, 5.0), (6.0, 5.0));
}

#[test]
fn rotate_preview_matches_direct_rotation_after_many_ticks() {
    let source = [
        line(1.0, 0.0, 2.0, 0.0),
        Geometry::Circle(Circle::new(Point2::new(3.0, 1.0), 0.5)),
    ];
    let mut editor = Editor::default();
    let ids = start_on(&mut editor, "ROTATE", &source);
    click(&mut editor, 1.0, 1.0);

    wander(&mut editor, (1.0, 1.0), 20.0);
    hover(&mut editor, 1.0, 6.0);

    let expected = transformed(&source, &Transform2D::rotation_about(FRAC_PI_2, &Point2::new(1.0, 1.0)));
    assert_geometries_close(&preview_geometries(&editor), &expected);
    assert_extents_close(&editor.context().jig.extents(), &extents_of(&expected));

    assert_eq!(click(&mut editor, 1.0, 6.0), CommandState::Committed);
    let committed: Vec<Geometry> = ids.iter().map(|id| geometry(&editor, *id)).collect();
    assert_geometries_close(&committed, &expected);
    assert_idle(&editor);
}

#[test]
fn scale_preview_matches_direct_scale_after_many_ticks() {
    let source = [
        line(3.0, -1.0, 4.0, 1.0),
        Geometry::Circle(Circle::new(Point2::new(2.0, 2.0), 1.5)),
    ];
    let mut editor = Editor::default();
    let ids = start_on(&mut editor, "SCALE", &source);
    click(&mut editor, 2.0, -1.0);

    wander(&mut editor, (2.0, -1.0), 50.0);
    // 指针到基点的距离为 5
    hover(&mut editor, 5.0, 3.0);

    let expected = transformed(&source, &Transform2D::scale_about(5.0, 5.0, &Point2::new(2.0, -1.0)));
    assert_geometries_close(&preview_geometries(&editor), &expected);
    assert_extents_close(&editor.context().jig.extents(), &extents_of(&expected));

    assert_eq!(click(&mut editor, 5.0, 3.0), CommandState::Committed);
    let committed: Vec<Geometry> = ids.iter().map(|id| geometry(&editor, *id)).collect();
    assert_geometries_close(&committed, &expected);
    assert_idle(&editor);
}

#[test]
fn mirror_preview_matches_direct_mirror_after_many_ticks() {
    let source = [
        line(1.0, 0.0, 2.0, 1.0),
        Geometry::Circle(Circle::new(Point2::new(-2.0, 3.0), 1.0)),
    ];
    let mut editor = Editor::default();
    start_on(&mut editor, "MIRROR", &source);
    click(&mut editor, 0.0, 0.0);

    wander(&mut editor, (0.0, 0.0), 30.0);
    hover(&mut editor, 2.0, 2.0);

    let mirror = Transform2D::mirror(&Point2::new(0.0, 0.0), &Vector2::new(1.0, 1.0));
    let expected = transformed(&source, &mirror);
    assert_geometries_close(&preview_geometries(&editor), &expected);

    click(&mut editor, 2.0, 2.0);
    // 第二点确定后预览停在最终的镜像位置
    assert_geometries_close(&preview_geometries(&editor), &expected);
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);

    let document = editor.document();
    let copies: Vec<Geometry> = document.entities().skip(2).map(|e| e.geometry.clone()).collect();
    drop(document);
    assert_geometries_close(&copies, &expected);
    assert_idle(&editor);
}

#[test]
fn copy_preserves_originals() {
    let mut editor = Editor::default();
    let a = add(&editor, line(0.0, 0.0, 1.0, 0.0));
    let b = add(&editor, line(0.0, 1.0, 1.0, 1.0));
    editor.handle_event(InputEvent::Pick(vec![a, b]));
    editor.run_command("COPY").unwrap();
    click(&mut editor, 0.0, 0.0);
    assert_eq!(type_text(&mut editor, "@0,10"), CommandState::Committed);

    assert_eq!(editor.document().len(), 4);
    assert_line(&geometry(&editor, a), (0.0, 0.0), (1.0, 0.0));
    assert_line(&geometry(&editor, b), (0.0, 1.0), (1.0, 1.0));
    assert_line(&last_geometry(&editor), (0.0, 11.0), (1.0, 11.0));
}

#[test]
fn rotate_by_typed_angle() {
    let mut editor = Editor::default();
    let id = add(&editor, line(1.0, 0.0, 2.0, 0.0));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("RO").unwrap();
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 0.0, 5.0);
    assert_eq!(type_text(&mut editor, "90"), CommandState::Committed);
    assert_line(&geometry(&editor, id), (0.0, 1.0), (0.0, 2.0));
    assert_idle(&editor);
}

#[test]
fn rotate_copy_keyword_keeps_source() {
    let mut editor = Editor::default();
    let id = add(&editor, line(1.0, 0.0, 2.0, 0.0));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("ROTATE").unwrap();
    click(&mut editor, 0.0, 0.0);
    type_text(&mut editor, "c");
    assert_eq!(click(&mut editor, -3.0, 0.0), CommandState::Committed);

    assert_eq!(editor.document().len(), 2);
    assert_line(&geometry(&editor, id), (1.0, 0.0), (2.0, 0.0));
    assert_line(&last_geometry(&editor), (-1.0, 0.0), (-2.0, 0.0));
}

#[test]
fn scale_about_base_point() {
    let mut editor = Editor::default();
    let id = add(&editor, Geometry::Circle(Circle::new(Point2::new(2.0, 0.0), 1.0)));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("SCALE").unwrap();
    click(&mut editor, 0.0, 0.0);
    hover(&mut editor, 3.0, 0.0);
    hover(&mut editor, 0.0, 0.0);
    assert_eq!(type_text(&mut editor, "0"), CommandState::Gathering);
    assert_eq!(type_text(&mut editor, "2"), CommandState::Committed);

    assert_eq!(
        geometry(&editor, id),
        Geometry::Circle(Circle::new(Point2::new(4.0, 0.0), 2.0))
    );
    assert_idle(&editor);
}

#[test]
fn mirror_keeps_source_by_default() {
    let mut editor = Editor::default();
    let id = add(&editor, line(1.0, 0.0, 2.0, 1.0));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("MIRROR").unwrap();
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 0.0, 1.0);
    assert!(editor.prompt().contains("[Yes/No] <No>"));
    assert!(!editor.context().jig.is_empty());

    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);
    assert_eq!(editor.document().len(), 2);
    assert_line(&geometry(&editor, id), (1.0, 0.0), (2.0, 1.0));
    assert_line(&last_geometry(&editor), (-1.0, 0.0), (-2.0, 1.0));
    assert_idle(&editor);
}

#[test]
fn mirror_erasing_source_transforms_in_place() {
    let mut editor = Editor::default();
    let id = add(&editor, line(1.0, 0.0, 2.0, 1.0));
    editor.handle_event(InputEvent::Pick(vec![id]));
    editor.run_command("MI").unwrap();
    click(&mut editor, 0.0, 0.0);
    click(&mut editor, 1.0, 0.0);
    assert_eq!(type_text(&mut editor, "y"), CommandState::Committed);

    assert_eq!(editor.document().len(), 1);
    assert_line(&geometry(&editor, id), (1.0, 0.0), (2.0, -1.0));
}

#[test]
fn erase_removes_selection() {
    let mut editor = Editor::default();
    let a = add(&editor, line(0.0, 0.0, 1.0, 0.0));
    let b = add(&editor, line(0.0, 1.0, 1.0, 1.0));
    editor.handle_event(InputEvent::Pick(vec![a]));
    assert_eq!(editor.run_command("ERASE").unwrap(), CommandState::Committed);

    assert_eq!(editor.document().len(), 1);
    assert!(editor.document().contains(b));
    assert!(editor.selection().is_empty());
}

#[test]
fn select_window_versus_crossing() {
    let mut editor = Editor::default();
    let inside = add(&editor, Geometry::Circle(Circle::new(Point2::new(5.0, 5.0), 1.0)));
    let crossing = add(&editor, line(8.0, 5.0, 15.0, 5.0));

    editor.run_command("SELECT").unwrap();
    click(&mut editor, 0.0, 0.0);
    assert_eq!(click(&mut editor, 10.0, 10.0), CommandState::Committed);
    assert_eq!(editor.selection().ids(), &[inside]);

    editor.handle_event(InputEvent::Escape);
    editor.run_command("SELECT").unwrap();
    click(&mut editor, 10.0, 10.0);
    click(&mut editor, 0.0, 0.0);
    assert_eq!(editor.selection().ids(), &[inside, crossing]);
    assert_idle(&editor);
}

#[test]
fn zoom_extents_is_default() {
    let mut editor = Editor::default();
    add(&editor, line(0.0, 0.0, 100.0, 50.0));
    editor.run_command("ZOOM").unwrap();
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);

    let view = editor.viewport().view();
    assert_abs_diff_eq!(view.min.x, -5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(view.max.x, 105.0, epsilon = 1e-9);
    assert_abs_diff_eq!(view.max.y, 55.0, epsilon = 1e-9);
}

#[test]
fn zoom_on_empty_document_cancels() {
    let mut editor = Editor::default();
    let before = editor.viewport();
    editor.run_command("Z").unwrap();
    assert_eq!(type_text(&mut editor, "e"), CommandState::Cancelled);
    assert_eq!(editor.viewport(), before);
}

#[test]
fn zoom_object_uses_picked_extents() {
    let mut editor = Editor::default();
    add(&editor, line(0.0, 0.0, 100.0, 100.0));
    let small = add(&editor, line(10.0, 10.0, 20.0, 20.0));
    editor.run_command("ZOOM").unwrap();
    type_text(&mut editor, "o");
    editor.handle_event(InputEvent::Pick(vec![small]));
    assert_eq!(editor.handle_event(InputEvent::Enter), CommandState::Committed);
    assert_abs_diff_eq!(editor.viewport().center().x, 15.0, epsilon = 1e-9);
}
