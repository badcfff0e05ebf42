use kurbo::{Rect, Size};

use super::*;
use crate::container::StickyContainer;
use crate::events::EventKind;
use crate::events::viewport::Viewport;
use crate::frame::scheduler::FrameLoop;
use crate::host::scene::{Scene, SceneNode};

const CONTAINER: NodeId = NodeId(1);
const NODES: StickyNodes = StickyNodes {
    placeholder: NodeId(2),
    content: NodeId(3),
};

fn scene_node(id: NodeId, parent: Option<NodeId>, rect: Rect) -> SceneNode {
    SceneNode {
        id,
        parent,
        rect,
        scroll_height: None,
        scroll_top: 0.0,
        positioned: false,
        hidden: false,
    }
}

struct Rig {
    scene: Scene,
    viewport: Viewport,
    frames: FrameLoop,
    container: StickyContainer,
}

impl Rig {
    /// Container spanning y 200..1400 of a 600px-high window, with the sticky element at y 300.
    fn window() -> Self {
        let mut scene = Scene::new(Size::new(800.0, 600.0)).unwrap();
        scene
            .insert(scene_node(
                CONTAINER,
                None,
                Rect::new(0.0, 200.0, 800.0, 1400.0),
            ))
            .unwrap();
        scene
            .insert(scene_node(
                NODES.placeholder,
                Some(CONTAINER),
                Rect::new(10.0, 300.0, 310.0, 300.0),
            ))
            .unwrap();
        scene
            .insert(scene_node(
                NODES.content,
                Some(CONTAINER),
                Rect::new(10.0, 300.0, 310.0, 340.0),
            ))
            .unwrap();
        Self::with_scene(scene)
    }

    /// Positioned scroller at y 100..400 with 1200px of content; sticky element at y 250.
    fn scroller() -> Self {
        let mut scene = Scene::new(Size::new(800.0, 600.0)).unwrap();
        let mut container = scene_node(CONTAINER, None, Rect::new(0.0, 100.0, 800.0, 400.0));
        container.scroll_height = Some(1200.0);
        container.positioned = true;
        scene.insert(container).unwrap();
        scene
            .insert(scene_node(
                NODES.placeholder,
                Some(CONTAINER),
                Rect::new(0.0, 250.0, 800.0, 250.0),
            ))
            .unwrap();
        scene
            .insert(scene_node(
                NODES.content,
                Some(CONTAINER),
                Rect::new(0.0, 250.0, 800.0, 290.0),
            ))
            .unwrap();
        scene
            .insert(scene_node(
                NodeId(4),
                None,
                Rect::new(0.0, 400.0, 800.0, 2000.0),
            ))
            .unwrap();
        Self::with_scene(scene)
    }

    fn with_scene(scene: Scene) -> Self {
        let viewport = Viewport::new();
        let frames = FrameLoop::new();
        let container = StickyContainer::mount(CONTAINER, &viewport, Rc::new(frames.clone()));
        Self {
            scene,
            viewport,
            frames,
            container,
        }
    }

    fn mount(&self, config: StickyConfig) -> Sticky {
        Sticky::mount(Some(self.container.handle()), NODES, config).unwrap()
    }

    fn scroll_window(&mut self, y: f64) {
        self.scene.set_window_scroll(y);
        self.viewport.dispatch(EventKind::Scroll);
        self.frames.run_frame(&self.scene);
    }

    fn scroll_container(&mut self, y: f64) {
        self.scene.set_scroll_top(CONTAINER, y).unwrap();
        self.container.dispatch(EventKind::Scroll);
        self.frames.run_frame(&self.scene);
    }
}

#[test]
fn mount_without_container_is_a_usage_error() {
    let err = Sticky::mount(None, NODES, StickyConfig::default()).unwrap_err();
    assert!(matches!(err, StickyError::Usage(_)));
}

#[test]
fn mount_in_torn_down_container_is_a_usage_error() {
    let rig = Rig::window();
    let handle = rig.container.handle();
    rig.container.teardown();
    let err = Sticky::mount(Some(handle), NODES, StickyConfig::default()).unwrap_err();
    assert!(matches!(err, StickyError::Usage(_)));
}

#[test]
fn mount_rejects_invalid_config() {
    let rig = Rig::window();
    let cfg = StickyConfig {
        top_offset: f64::NAN,
        ..StickyConfig::default()
    };
    let err = Sticky::mount(Some(rig.container.handle()), NODES, cfg).unwrap_err();
    assert!(matches!(err, StickyError::Validation(_)));
    assert_eq!(rig.container.subscriber_count(), 0);
}

#[test]
fn pins_when_the_window_scrolls_past_the_container() {
    let mut rig = Rig::window();
    let sticky = rig.mount(StickyConfig::default());
    assert_eq!(rig.container.subscriber_count(), 1);

    rig.scroll_window(100.0);
    let state = sticky.state();
    assert!(!state.is_sticky);
    assert_eq!(state.distance_from_top, 100.0);
    assert_eq!(state.calculated_height, 40.0);

    rig.scroll_window(350.0);
    let state = sticky.state();
    assert!(state.is_sticky);
    assert!(!state.was_sticky);
    assert_eq!(state.style.top, Some(0.0));
    assert_eq!(state.style.left, Some(10.0));
    assert_eq!(state.style.width, Some(300.0));
    assert_eq!(sticky.placeholder_style().padding_bottom, Some(40.0));

    rig.scroll_window(0.0);
    let state = sticky.state();
    assert!(!state.is_sticky);
    assert!(state.was_sticky);
    assert_eq!(sticky.placeholder_style(), PlaceholderStyle::default());
}

#[test]
fn hidden_content_keeps_the_previous_state() {
    let mut rig = Rig::window();
    let sticky = rig.mount(StickyConfig::default());
    rig.scroll_window(350.0);
    let pinned = sticky.state();
    assert!(pinned.is_sticky);

    rig.scene.set_hidden(NODES.content, true).unwrap();
    rig.scroll_window(0.0);
    assert_eq!(sticky.state(), pinned);

    rig.scene.set_hidden(NODES.content, false).unwrap();
    rig.scroll_window(0.0);
    assert!(!sticky.state().is_sticky);
}

#[test]
fn relative_mode_follows_the_container_scroll() {
    let mut rig = Rig::scroller();
    let sticky = rig.mount(StickyConfig {
        relative: true,
        ..StickyConfig::default()
    });

    rig.scroll_container(200.0);
    let state = sticky.state();
    assert!(state.is_sticky);
    assert_eq!(state.distance_from_top, -150.0);
    assert_eq!(state.distance_from_bottom, 960.0);
    assert_eq!(state.style.top, Some(100.0));

    // Window-sourced frames may not change a relative element.
    rig.scene.set_scroll_top(CONTAINER, 0.0).unwrap();
    rig.scroll_window(50.0);
    assert!(sticky.state().is_sticky);

    rig.scroll_container(0.0);
    assert!(!sticky.state().is_sticky);
}

#[test]
fn teardown_drops_a_queued_frame() {
    let mut rig = Rig::scroller();
    let sticky = rig.mount(StickyConfig {
        relative: true,
        ..StickyConfig::default()
    });
    rig.scroll_container(200.0);
    let before = sticky.state();

    rig.scene.set_scroll_top(CONTAINER, 0.0).unwrap();
    rig.container.dispatch(EventKind::Scroll);
    let handle = rig.container.handle();
    rig.container.teardown();
    assert_eq!(handle.parent(), None);
    assert_eq!(rig.frames.run_frame(&rig.scene), 0);
    assert_eq!(sticky.state(), before);
}

#[test]
fn toggling_hardware_acceleration_only_changes_transform() {
    let mut rig = Rig::window();
    let sticky = rig.mount(StickyConfig::default());
    rig.scroll_window(350.0);
    let with_hint = sticky.state();
    assert!(with_hint.style.transform.is_some());

    sticky
        .set_config(StickyConfig {
            disable_hardware_acceleration: true,
            ..sticky.config()
        })
        .unwrap();
    rig.scroll_window(350.0);
    let without_hint = sticky.state();
    assert_eq!(without_hint.style.transform, None);
    assert_eq!(without_hint.style.top, with_hint.style.top);
    assert_eq!(without_hint.style.left, with_hint.style.left);
    assert_eq!(without_hint.style.width, with_hint.style.width);
    assert_eq!(without_hint.style.position, with_hint.style.position);
    assert!(without_hint.was_sticky);
}

#[test]
fn set_config_validates() {
    let rig = Rig::window();
    let sticky = rig.mount(StickyConfig::default());
    assert!(
        sticky
            .set_config(StickyConfig {
                bottom_offset: f64::INFINITY,
                ..StickyConfig::default()
            })
            .is_err()
    );
    assert_eq!(sticky.config(), StickyConfig::default());
}

#[test]
fn unmount_and_drop_unsubscribe() {
    let mut rig = Rig::window();
    let a = rig.mount(StickyConfig::default());
    let b = rig.mount(StickyConfig::default());
    assert_eq!(rig.container.subscriber_count(), 2);

    a.unmount();
    assert_eq!(rig.container.subscriber_count(), 1);
    rig.scroll_window(350.0);
    assert!(b.state().is_sticky);

    drop(b);
    assert_eq!(rig.container.subscriber_count(), 0);
}

#[test]
fn render_wraps_the_child_output() {
    let mut rig = Rig::window();
    let sticky = rig.mount(StickyConfig {
        disable_compensation: true,
        ..StickyConfig::default()
    });
    rig.scroll_window(350.0);

    let rendered = sticky.render(|state| format!("pinned={}", state.is_sticky));
    assert_eq!(rendered.wrapper_class, WRAPPER_CLASS);
    assert_eq!(rendered.placeholder_class, PLACEHOLDER_CLASS);
    assert_eq!(rendered.placeholder.padding_bottom, Some(0.0));
    assert_eq!(rendered.content, "pinned=true");
    assert_eq!(sticky.nodes(), NODES);
}
