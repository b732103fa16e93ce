use flyght_core::{Event, PageDocument};
use flyght_motion::{
    pages, MotionConfig, MotionContext, RecordingNavigator, Stage, TransitionController,
    TransitionSignal, TransitionState, Viewport,
};

fn film_stage(navigator: &RecordingNavigator) -> Stage {
    let doc = PageDocument::from_toml(pages::FILM).unwrap();
    let store = doc.build_store().unwrap();
    let viewport = Viewport::new(doc.viewport.width, doc.viewport.height);
    let ctx = MotionContext::new(store, viewport, MotionConfig::default())
        .with_navigator(navigator.clone());
    Stage::new(ctx)
}

#[test]
fn test_double_click_runs_once_and_navigates_once() {
    let navigator = RecordingNavigator::new();
    let mut stage = film_stage(&navigator);
    let controller = TransitionController::from_config(stage.ctx()).unwrap();
    let controller = stage.mount(controller);

    stage.dispatch(&Event::click(700.0, 400.0));
    stage.dispatch(&Event::click(700.0, 400.0));
    assert_eq!(controller.borrow().state(), TransitionState::Launching);

    for _ in 0..(60 * 4) {
        stage.advance(1.0 / 60.0);
        // Clicks during the run are ignored
        stage.dispatch(&Event::click(10.0, 10.0));
    }

    let controller = controller.borrow();
    assert_eq!(controller.state(), TransitionState::Done);
    assert!(controller.is_latched());
    assert_eq!(
        controller.history(),
        &[
            (TransitionState::Idle, TransitionSignal::Click, TransitionState::Launching),
            (
                TransitionState::Launching,
                TransitionSignal::LiftoffComplete,
                TransitionState::Transitioning
            ),
            (
                TransitionState::Transitioning,
                TransitionSignal::SequenceComplete,
                TransitionState::Done
            ),
        ]
    );
    assert_eq!(navigator.requests(), vec!["/".to_string()]);
}

#[test]
fn test_liftoff_completes_before_navigation() {
    let navigator = RecordingNavigator::new();
    let mut stage = film_stage(&navigator);
    let controller = TransitionController::from_config(stage.ctx()).unwrap();
    let controller = stage.mount(controller);

    stage.dispatch(&Event::click(700.0, 400.0));

    // Lift-off is 1.2s; the whole sequence 2.7s
    for _ in 0..90 {
        stage.advance(1.0 / 60.0);
    }
    assert_eq!(controller.borrow().state(), TransitionState::Transitioning);
    assert!(navigator.requests().is_empty());

    for _ in 0..90 {
        stage.advance(1.0 / 60.0);
    }
    assert_eq!(controller.borrow().state(), TransitionState::Done);
    assert_eq!(navigator.requests().len(), 1);
}

#[test]
fn test_custom_destination() {
    let navigator = RecordingNavigator::new();
    let mut stage = film_stage(&navigator);
    let config = MotionConfig::from_toml(
        r#"
        [transition]
        destination = "/films/next"
        exit_delay = 0.0
        "#,
    )
    .unwrap();
    let controller = stage.mount(TransitionController::new(config.transition).unwrap());

    stage.dispatch(&Event::click(0.0, 0.0));
    for _ in 0..(60 * 3) {
        stage.advance(1.0 / 60.0);
    }
    assert_eq!(controller.borrow().state(), TransitionState::Done);
    assert_eq!(navigator.requests(), vec!["/films/next".to_string()]);
}
