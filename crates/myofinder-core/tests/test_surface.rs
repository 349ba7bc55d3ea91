mod common;

use std::collections::BTreeMap;
use std::sync::mpsc;

use approx::assert_relative_eq;
use common::{recorder, solid_image, solid_surface, viewport, BASE};
use image::RgbaImage;
use kurbo::{Point, Vec2};
use myofinder_core::consts::NUCLEUS_INSIDE_COLOR;
use myofinder_core::error::MyofinderError;
use myofinder_core::ids::SurfaceId;
use myofinder_core::input::{ClientRect, InputEvent, MouseButton};
use myofinder_core::io::processing::{FiberBatch, FiberEntry, NucleiBatch};
use myofinder_core::markers::{Classification, NucleusRecord};
use myofinder_core::notify::ChannelObserver;
use myofinder_core::surface::{EventOutcome, Surface};

/// 1600 x 1200 image on an 800 x 600 frame, displayed at half size on screen.
fn hidpi_surface() -> Surface {
    let mut surface = solid_surface((1600, 1200), (800, 600));
    surface.set_client_rect(ClientRect {
        left: 100.0,
        top: 50.0,
        width: 400.0,
        height: 300.0,
    });
    surface
}

fn square_path() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 2.0),
        Point::new(0.0, 2.0),
    ]
}

fn fiber_batch(count: usize, area: f64) -> FiberBatch {
    let entries: BTreeMap<String, FiberEntry> = (0..count)
        .map(|i| {
            let x = i as f64 * 10.0;
            (
                i.to_string(),
                FiberEntry {
                    fiber_path: vec![[x, 0.0], [x + 5.0, 0.0], [x + 5.0, 5.0]],
                    fiber_area: area,
                },
            )
        })
        .collect();
    FiberBatch(entries)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_empty_image_is_rejected() {
    let result = Surface::new(SurfaceId(0), "empty", RgbaImage::new(0, 0), viewport(10, 10));
    assert!(matches!(
        result,
        Err(MyofinderError::InvalidDimensions {
            width: 0,
            height: 0
        })
    ));
}

#[test]
fn test_viewport_must_fit_the_rasterizer() {
    let result = Surface::new(
        SurfaceId(0),
        "wide",
        solid_image(4, 4, BASE),
        viewport(70_000, 10),
    );
    assert!(matches!(
        result,
        Err(MyofinderError::InvalidDimensions {
            width: 70_000,
            height: 10
        })
    ));
    let result = Surface::new(SurfaceId(0), "flat", solid_image(4, 4, BASE), viewport(10, 0));
    assert!(matches!(
        result,
        Err(MyofinderError::InvalidDimensions { .. })
    ));
}

#[test]
fn test_new_surface_is_fitted() {
    let surface = solid_surface((1600, 1200), (800, 600));
    assert_relative_eq!(surface.engine().scale(), 0.5);
    assert_eq!(surface.frames_rendered(), 0);
    assert_eq!(surface.name(), "test.png");
    assert!(surface.source().is_none());
}

// ---------------------------------------------------------------------------
// Input routing
// ---------------------------------------------------------------------------

#[test]
fn test_primary_click_adds_inside_nucleus_with_dpi_correction() {
    let mut surface = hidpi_surface();
    let outcome = surface.handle_event(InputEvent::Click {
        button: MouseButton::Primary,
        client: Point::new(300.0, 200.0),
    });

    let EventOutcome::NucleusAdded(nucleus) = outcome else {
        panic!("expected a nucleus, got {outcome:?}");
    };
    // (300, 200) client -> (200, 150) in rect -> (400, 300) backing -> (800, 600) world.
    assert_relative_eq!(nucleus.x(), 800.0);
    assert_relative_eq!(nucleus.y(), 600.0);
    assert_eq!(nucleus.classification(), Classification::Inside);
    assert_eq!(surface.markers().nuclei.len(), 1);
    assert_eq!(surface.frames_rendered(), 1);
}

#[test]
fn test_secondary_click_adds_outside_nucleus() {
    let mut surface = hidpi_surface();
    let outcome = surface.handle_event(InputEvent::Click {
        button: MouseButton::from(2u8),
        client: Point::new(100.0, 50.0),
    });
    let EventOutcome::NucleusAdded(nucleus) = outcome else {
        panic!("expected a nucleus, got {outcome:?}");
    };
    assert_eq!(nucleus.classification(), Classification::Outside);
    assert_relative_eq!(nucleus.x(), 0.0);
    assert_relative_eq!(nucleus.y(), 0.0);
}

#[test]
fn test_other_clicks_are_ignored() {
    let mut surface = hidpi_surface();
    for button in [MouseButton::Middle, MouseButton::Other(4)] {
        let outcome = surface.handle_event(InputEvent::Click {
            button,
            client: Point::new(200.0, 200.0),
        });
        assert_eq!(outcome, EventOutcome::Ignored);
    }
    assert!(surface.markers().nuclei.is_empty());
}

#[test]
fn test_wheel_zooms_at_unscaled_cursor() {
    let mut surface = hidpi_surface();
    let before = surface.engine().screen_to_world(Point::new(400.0, 300.0));

    let outcome = surface.handle_event(InputEvent::Wheel {
        client: Point::new(500.0, 350.0),
        delta_y: -100.0,
    });

    assert_eq!(outcome, EventOutcome::Zoomed);
    assert!(surface.engine().scale() > 0.5);
    let after = surface.engine().screen_to_world(Point::new(400.0, 300.0));
    assert_relative_eq!(after.x, before.x, epsilon = 1e-9);
    assert_relative_eq!(after.y, before.y, epsilon = 1e-9);
    assert_eq!(surface.frames_rendered(), 1);
}

#[test]
fn test_middle_drag_pans() {
    let mut surface = hidpi_surface();
    surface.set_view(1.0, Vec2::new(-300.0, -300.0));

    let down = surface.handle_event(InputEvent::PointerDown {
        button: MouseButton::Middle,
        client: Point::new(200.0, 200.0),
    });
    assert_eq!(down, EventOutcome::DragStarted);

    let moved = surface.handle_event(InputEvent::PointerMove {
        client: Point::new(190.0, 195.0),
    });
    assert_eq!(moved, EventOutcome::Panned);
    assert_eq!(surface.engine().pan_offset(), Vec2::new(-310.0, -305.0));

    let up = surface.handle_event(InputEvent::PointerUp);
    assert_eq!(up, EventOutcome::DragEnded);

    let after = surface.handle_event(InputEvent::PointerMove {
        client: Point::new(0.0, 0.0),
    });
    assert_eq!(after, EventOutcome::Ignored);
    assert_eq!(surface.engine().pan_offset(), Vec2::new(-310.0, -305.0));
}

#[test]
fn test_primary_press_does_not_drag() {
    let mut surface = hidpi_surface();
    let down = surface.handle_event(InputEvent::PointerDown {
        button: MouseButton::Primary,
        client: Point::new(10.0, 10.0),
    });
    assert_eq!(down, EventOutcome::Ignored);
    assert!(!surface.engine().is_dragging());
}

#[test]
fn test_pointer_leave_ends_drag() {
    let mut surface = hidpi_surface();
    surface.handle_event(InputEvent::PointerDown {
        button: MouseButton::Middle,
        client: Point::new(10.0, 10.0),
    });
    surface.handle_event(InputEvent::PointerLeave);
    assert!(!surface.engine().is_dragging());
}

// ---------------------------------------------------------------------------
// Marker mutations and notifications
// ---------------------------------------------------------------------------

#[test]
fn test_every_mutation_notifies_once() {
    let mut surface = solid_surface((100, 100), (100, 100));
    let (seen, observer) = recorder();
    surface.subscribe(observer);

    let a = surface.add_nucleus(10.0, 10.0, Classification::Inside);
    surface.add_nucleus(20.0, 20.0, Classification::Outside);
    surface.remove_nucleus(&a).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].positive_count, 1);
    assert_eq!(seen[0].positive_ratio, Some(1.0));
    assert_eq!(seen[1].total, 2);
    assert_eq!(seen[2].positive_count, 0);
    assert_eq!(seen[2].ratio_label(), "NA");
}

#[test]
fn test_failed_remove_does_not_notify() {
    let mut surface = solid_surface((100, 100), (100, 100));
    let nucleus = surface.add_nucleus(1.0, 1.0, Classification::Inside);
    surface.remove_nucleus(&nucleus).unwrap();

    let (seen, observer) = recorder();
    surface.subscribe(observer);
    let err = surface.remove_nucleus(&nucleus).unwrap_err();
    assert!(matches!(err, MyofinderError::NucleusNotFound(_)));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_markers_of_another_surface_are_not_removed() {
    let mut a = solid_surface((100, 100), (100, 100));
    let mut b = Surface::new(
        SurfaceId(1),
        "other.png",
        solid_image(100, 100, BASE),
        viewport(100, 100),
    )
    .unwrap();

    let a_nucleus = a.add_nucleus(5.0, 5.0, Classification::Inside);
    b.add_nucleus(5.0, 5.0, Classification::Outside);
    let a_fiber_id = a.add_fiber(square_path(), 4.0);
    b.add_fiber(square_path(), 4.0);
    let a_fiber = a.markers().fibers.get(a_fiber_id).unwrap().clone();
    assert_eq!(a_nucleus.id(), b.markers().nuclei.iter().next().unwrap().id());

    let (seen, observer) = recorder();
    b.subscribe(observer);
    assert!(matches!(
        b.remove_nucleus(&a_nucleus),
        Err(MyofinderError::NucleusNotFound(_))
    ));
    assert!(matches!(
        b.remove_fiber(&a_fiber),
        Err(MyofinderError::FiberNotFound(_))
    ));
    assert_eq!(b.markers().nuclei.len(), 1);
    assert_eq!(b.markers().fibers.len(), 1);
    assert!(seen.borrow().is_empty());

    a.remove_nucleus(&a_nucleus).unwrap();
    a.remove_fiber(&a_fiber).unwrap();
    assert!(a.markers().nuclei.is_empty());
    assert!(a.markers().fibers.is_empty());
}

#[test]
fn test_nucleus_is_drawn_after_add() {
    let mut surface = solid_surface((100, 100), (100, 100));
    surface.add_nucleus(50.0, 50.0, Classification::Inside);
    assert_eq!(*surface.frame().get_pixel(50, 50), NUCLEUS_INSIDE_COLOR);
    assert_eq!(*surface.frame().get_pixel(10, 10), BASE);
}

#[test]
fn test_bulk_fibers_notify_once() {
    let mut surface = solid_surface((1000, 1000), (100, 100));
    let (seen, observer) = recorder();
    surface.subscribe(observer);

    surface.add_fibers_batch(&fiber_batch(3, 100.0));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_relative_eq!(seen[0].fiber_area_ratio, 0.0003, epsilon = 1e-12);
    for fiber in surface.markers().fibers.iter() {
        assert_relative_eq!(fiber.ratio(), 0.0001);
    }
    assert_eq!(surface.frames_rendered(), 1);
}

#[test]
fn test_bulk_fibers_keep_numeric_id_order() {
    let mut surface = solid_surface((100, 100), (100, 100));
    let batch = fiber_batch(12, 1.0);
    surface.add_fibers_batch(&batch);
    let first_x: Vec<f64> = surface
        .markers()
        .fibers
        .iter()
        .map(|f| f.path()[0].x)
        .collect();
    let expected: Vec<f64> = (0..12).map(|i| f64::from(i) * 10.0).collect();
    assert_eq!(first_x, expected);
}

#[test]
fn test_bulk_nuclei_notify_once() {
    let mut surface = solid_surface((100, 100), (100, 100));
    let (tx, rx) = mpsc::channel();
    surface.subscribe(ChannelObserver(tx));

    surface.add_nuclei_batch(&NucleiBatch {
        nuclei_in: vec![[1.0, 1.0], [2.0, 2.0]],
        nuclei_out: vec![[3.0, 3.0]],
    });

    let snapshot = rx.try_recv().unwrap();
    assert_eq!(snapshot.total, 3);
    assert_eq!(snapshot.positive_count, 2);
    assert_relative_eq!(snapshot.positive_ratio.unwrap(), 2.0 / 3.0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_single_fiber_ratio_uses_image_size() {
    let mut surface = solid_surface((200, 50), (100, 100));
    let id = surface.add_fiber(
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ],
        50.0,
    );
    let fiber = surface.markers().fibers.get(id).unwrap();
    assert_relative_eq!(fiber.ratio(), 0.005);
    assert_relative_eq!(surface.snapshot().fiber_area_ratio, 0.005);
}

#[test]
fn test_invalid_record_adds_nothing() {
    let mut surface = solid_surface((100, 100), (100, 100));
    let records = vec![
        NucleusRecord {
            id: 0,
            x_pos: 1.0,
            y_pos: 1.0,
            kind: 0,
        },
        NucleusRecord {
            id: 1,
            x_pos: 2.0,
            y_pos: 2.0,
            kind: 9,
        },
    ];
    let err = surface.load_nucleus_records(&records).unwrap_err();
    assert!(matches!(err, MyofinderError::InvalidClassification(9)));
    assert!(surface.markers().nuclei.is_empty());
}

#[test]
fn test_reset_markers() {
    let mut surface = solid_surface((100, 100), (100, 100));
    surface.add_nucleus(1.0, 1.0, Classification::Inside);
    surface.add_fibers_batch(&fiber_batch(2, 10.0));
    surface.reset_markers();

    let snapshot = surface.snapshot();
    assert_eq!(snapshot.total, 0);
    assert_eq!(snapshot.positive_ratio, None);
    assert_eq!(snapshot.fiber_area_ratio, 0.0);
    assert_eq!(*surface.frame().get_pixel(1, 1), BASE);
}

// ---------------------------------------------------------------------------
// Display settings
// ---------------------------------------------------------------------------

#[test]
fn test_channel_settings_apply_on_next_render() {
    let mut surface = solid_surface((10, 10), (10, 10));
    surface.render();
    surface.set_channels(true, false, false);
    assert_eq!(*surface.frame().get_pixel(0, 0), BASE);

    surface.render();
    assert_eq!(*surface.frame().get_pixel(0, 0), image::Rgba([10, 0, 0, 255]));
    assert_eq!(surface.channel_mask().enabled(), (true, false, false));
}

#[test]
fn test_visibility_flags() {
    let mut surface = Surface::new(
        SurfaceId(1),
        "img",
        solid_image(100, 100, BASE),
        viewport(100, 100),
    )
    .unwrap();
    surface.show_nuclei(false);
    surface.add_nucleus(50.0, 50.0, Classification::Inside);
    assert_eq!(*surface.frame().get_pixel(50, 50), BASE);
    assert!(!surface.visibility().nuclei);
    assert!(surface.visibility().fibers);
}
