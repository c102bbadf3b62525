//! Camera state and everything that moves it: pointer pans, wheel and pinch zoom,
//! toolbar zooms, fitting, centering and the single animation slot.

mod animation;
mod debounce;
mod gesture;

use crate::config::{GraphVariant, ViewportConfig};
use crate::model::{GraphNode, Point, WorldBounds};

pub use self::animation::{
    CameraPose, Clock, Easing, ManualClock, SystemClock, Tween, ease_out_cubic, ease_out_quad,
};
pub use self::debounce::Debouncer;
pub use self::gesture::{TouchGesture, TouchPoint};

use self::gesture::pinch_metrics;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 3.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        1.0
    } else {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub is_panning: bool,
    pub is_animating: bool,
}

impl ViewportState {
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            pan_x: self.pan_x,
            pan_y: self.pan_y,
            zoom: self.zoom,
        }
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan_x) / self.zoom,
            (screen.y - self.pan_y) / self.zoom,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan_x,
            world.y * self.zoom + self.pan_y,
        )
    }

    /// Pose at `zoom` that keeps the world point under `anchor` on the same pixel.
    fn anchored(&self, anchor: Point, zoom: f64) -> CameraPose {
        let world = self.screen_to_world(anchor);
        CameraPose {
            pan_x: anchor.x - world.x * zoom,
            pan_y: anchor.y - world.y * zoom,
            zoom,
        }
    }
}

/// Screen-space wheel event. `x`/`y` are relative to the graph surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub x: f64,
    pub y: f64,
}

/// Whether the host should let the platform handle the event as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FitOptions {
    /// Pixels on the right edge covered by a docked panel.
    pub occluded_right: f64,
    pub animate: bool,
}

pub type ViewportListener = Box<dyn FnMut(WorldBounds)>;

pub struct ViewportController<C: Clock = SystemClock> {
    state: ViewportState,
    config: ViewportConfig,
    variant: GraphVariant,
    clock: C,
    tween: Option<Tween>,
    notify_after_tween: bool,
    pan_anchor: Point,
    gesture: TouchGesture,
    container: (f64, f64),
    debouncer: Debouncer,
    listener: Option<ViewportListener>,
}

impl ViewportController<SystemClock> {
    pub fn new(config: ViewportConfig, variant: GraphVariant) -> Self {
        Self::with_clock(config, variant, SystemClock::default())
    }
}

impl<C: Clock> ViewportController<C> {
    pub fn with_clock(config: ViewportConfig, variant: GraphVariant, clock: C) -> Self {
        let preset = variant.preset();
        let debouncer = Debouncer::new(config.debounce);
        Self {
            state: ViewportState {
                pan_x: preset.pan_x,
                pan_y: preset.pan_y,
                zoom: clamp_zoom(preset.zoom),
                is_panning: false,
                is_animating: false,
            },
            config,
            variant,
            clock,
            tween: None,
            notify_after_tween: false,
            pan_anchor: Point::ORIGIN,
            gesture: TouchGesture::Idle,
            container: (0.0, 0.0),
            debouncer,
            listener: None,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn gesture(&self) -> TouchGesture {
        self.gesture
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn variant(&self) -> GraphVariant {
        self.variant
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.state.screen_to_world(screen)
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.state.world_to_screen(world)
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container = (width, height);
    }

    pub fn container_size(&self) -> (f64, f64) {
        self.container
    }

    /// World-space rectangle visible in the current container.
    pub fn world_bounds(&self) -> WorldBounds {
        let (width, height) = self.container;
        let ViewportState {
            pan_x, pan_y, zoom, ..
        } = self.state;
        WorldBounds {
            min_x: -pan_x / zoom,
            max_x: (width - pan_x) / zoom,
            min_y: -pan_y / zoom,
            max_y: (height - pan_y) / zoom,
        }
    }

    /// Called with the visible world bounds once camera movement settles.
    pub fn on_viewport_change(&mut self, listener: impl FnMut(WorldBounds) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Moves the camera immediately. Cancels any running animation.
    pub fn set_view(&mut self, pan_x: f64, pan_y: f64, zoom: f64) {
        self.cancel_animation();
        self.apply(CameraPose { pan_x, pan_y, zoom });
    }

    pub fn pan_start(&mut self, screen: Point) {
        self.cancel_animation();
        self.state.is_panning = true;
        self.pan_anchor = Point::new(screen.x - self.state.pan_x, screen.y - self.state.pan_y);
    }

    pub fn pan_move(&mut self, screen: Point) {
        if !self.state.is_panning {
            return;
        }
        self.state.pan_x = screen.x - self.pan_anchor.x;
        self.state.pan_y = screen.y - self.pan_anchor.y;
    }

    pub fn pan_end(&mut self) {
        self.state.is_panning = false;
        self.schedule_notify();
    }

    /// Horizontal-dominant deltas pan, everything else zooms around the cursor.
    /// The host must suppress native scrolling for every forwarded event.
    pub fn wheel(&mut self, input: WheelInput) -> Propagation {
        self.cancel_animation();
        if input.delta_x.abs() > input.delta_y.abs() {
            self.apply(CameraPose {
                pan_x: self.state.pan_x - input.delta_x * self.config.horizontal_pan_factor,
                ..self.state.pose()
            });
        } else {
            let factor = if input.delta_y > 0.0 {
                self.config.wheel_zoom_out
            } else {
                self.config.wheel_zoom_in
            };
            let zoom = clamp_zoom(self.state.zoom * factor);
            let pose = self.state.anchored(Point::new(input.x, input.y), zoom);
            self.apply(pose);
        }
        self.schedule_notify();
        Propagation::Stop
    }

    pub fn zoom_in(&mut self, center: Option<Point>, animate: bool) {
        self.zoom_by(self.config.zoom_in_step, center, animate);
    }

    pub fn zoom_out(&mut self, center: Option<Point>, animate: bool) {
        self.zoom_by(self.config.zoom_out_step, center, animate);
    }

    fn zoom_by(&mut self, factor: f64, center: Option<Point>, animate: bool) {
        let zoom = clamp_zoom(self.state.zoom * factor);
        let target = match center {
            Some(anchor) => self.state.anchored(anchor, zoom),
            None => CameraPose {
                zoom,
                ..self.state.pose()
            },
        };
        self.move_to(target, animate, self.config.zoom_duration);
    }

    pub fn double_click(&mut self, screen: Point) {
        self.cancel_animation();
        let zoom = clamp_zoom(self.state.zoom * self.config.double_click_step);
        let pose = self.state.anchored(screen, zoom);
        self.apply(pose);
        self.schedule_notify();
    }

    pub fn reset_view(&mut self, animate: bool) {
        let preset = self.variant.preset();
        let target = CameraPose {
            pan_x: preset.pan_x,
            pan_y: preset.pan_y,
            zoom: preset.zoom,
        };
        self.move_to(target, animate, self.config.reset_duration);
    }

    /// Frames every node (center ± radius) with `fit_padding` slack. No-op without nodes.
    pub fn auto_fit_to_viewport(
        &mut self,
        nodes: &[GraphNode],
        width: f64,
        height: f64,
        options: FitOptions,
    ) {
        let Some(target) = self.fit_pose(nodes, width, height, options.occluded_right) else {
            return;
        };

        if options.animate {
            let now = self.clock.now_ms();
            let tween = Tween::new(self.state.pose(), target, now, self.config.fit_duration)
                .stepped(self.config.fit_steps, Easing::OutQuad);
            self.start_tween(tween);
        } else {
            self.cancel_animation();
            self.apply(target);
            self.schedule_notify();
        }
    }

    pub fn fit_pose(
        &self,
        nodes: &[GraphNode],
        width: f64,
        height: f64,
        occluded_right: f64,
    ) -> Option<CameraPose> {
        if nodes.is_empty() {
            return None;
        }

        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for node in nodes {
            min.x = min.x.min(node.x - node.size);
            min.y = min.y.min(node.y - node.size);
            max.x = max.x.max(node.x + node.size);
            max.y = max.y.max(node.y + node.size);
        }

        let center = min.midpoint(max);
        let padded_width = (max.x - min.x) * self.config.fit_padding;
        let padded_height = (max.y - min.y) * self.config.fit_padding;
        let available_width = (width - occluded_right.max(0.0)).max(1.0);

        let zoom = clamp_zoom((available_width / padded_width).min(height / padded_height));
        Some(CameraPose {
            pan_x: available_width / 2.0 - center.x * zoom,
            pan_y: height / 2.0 - center.y * zoom,
            zoom,
        })
    }

    /// Puts `world` at the middle of a `width` × `height` viewport at the current zoom.
    pub fn center_viewport_on(&mut self, world: Point, width: f64, height: f64, animate: bool) {
        let zoom = self.state.zoom;
        let target = CameraPose {
            pan_x: width / 2.0 - world.x * zoom,
            pan_y: height / 2.0 - world.y * zoom,
            zoom,
        };
        self.move_to(target, animate, self.config.center_duration);
    }

    /// Starts an ease-out-cubic tween, replacing whichever tween was running.
    pub fn animate_to_view_state(&mut self, pan_x: f64, pan_y: f64, zoom: f64, duration_ms: f64) {
        let now = self.clock.now_ms();
        let target = CameraPose {
            pan_x,
            pan_y,
            zoom: clamp_zoom(zoom),
        };
        self.start_tween(Tween::new(self.state.pose(), target, now, duration_ms));
    }

    pub fn cancel_animation(&mut self) {
        if self.tween.take().is_some() {
            tracing::trace!("cancelled camera animation");
        }
        self.state.is_animating = false;
        self.notify_after_tween = false;
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> Propagation {
        self.cancel_animation();
        match touches {
            [] => self.end_touches(),
            [only] => self.begin_touch_pan(only.position()),
            _ => self.begin_pinch(touches),
        }
        Propagation::Continue
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Propagation {
        match (touches, self.gesture) {
            ([], _) => self.end_touches(),
            ([only], TouchGesture::Panning { anchor }) => {
                self.state.pan_x = only.x - anchor.x;
                self.state.pan_y = only.y - anchor.y;
            }
            ([only], _) => self.begin_touch_pan(only.position()),
            (_, TouchGesture::Pinching { last_distance, last_midpoint }) => {
                self.pinch(touches, last_distance, last_midpoint);
            }
            _ => self.begin_pinch(touches),
        }
        Propagation::Stop
    }

    pub fn touch_end(&mut self, touches: &[TouchPoint]) -> Propagation {
        match touches {
            [] => self.end_touches(),
            [only] => {
                if !matches!(self.gesture, TouchGesture::Panning { .. }) {
                    self.begin_touch_pan(only.position());
                }
            }
            _ => self.begin_pinch(touches),
        }
        Propagation::Continue
    }

    fn begin_touch_pan(&mut self, touch: Point) {
        let anchor = Point::new(touch.x - self.state.pan_x, touch.y - self.state.pan_y);
        self.gesture = TouchGesture::Panning { anchor };
        self.state.is_panning = true;
    }

    fn begin_pinch(&mut self, touches: &[TouchPoint]) {
        if let Some((distance, midpoint)) = pinch_metrics(touches) {
            self.gesture = TouchGesture::Pinching {
                last_distance: distance,
                last_midpoint: midpoint,
            };
            self.state.is_panning = false;
        }
    }

    fn pinch(&mut self, touches: &[TouchPoint], last_distance: f64, last_midpoint: Point) {
        let Some((distance, midpoint)) = pinch_metrics(touches) else {
            return;
        };
        self.cancel_animation();

        let scale = if last_distance > 0.0 {
            distance / last_distance
        } else {
            1.0
        };
        let zoom = clamp_zoom(self.state.zoom * scale);
        let pose = self.state.anchored(midpoint, zoom);
        let drift = midpoint - last_midpoint;
        self.apply(CameraPose {
            pan_x: pose.pan_x + drift.x,
            pan_y: pose.pan_y + drift.y,
            zoom,
        });

        self.gesture = TouchGesture::Pinching {
            last_distance: distance,
            last_midpoint: midpoint,
        };
    }

    fn end_touches(&mut self) {
        let was_active = self.gesture != TouchGesture::Idle;
        self.gesture = TouchGesture::Idle;
        self.state.is_panning = false;
        if was_active {
            self.schedule_notify();
        }
    }

    /// Advances the running tween and delivers a due viewport notification. Returns
    /// whether the host should schedule another frame.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();

        if let Some(tween) = self.tween {
            let (pose, finished) = tween.sample(now);
            self.apply(pose);
            if finished {
                self.tween = None;
                self.state.is_animating = false;
                if std::mem::take(&mut self.notify_after_tween) {
                    self.schedule_notify();
                }
            }
        }

        if self.debouncer.poll(now) {
            self.emit_bounds();
        }

        self.tween.is_some() || self.debouncer.is_pending()
    }

    fn move_to(&mut self, target: CameraPose, animate: bool, duration_ms: f64) {
        if animate {
            let now = self.clock.now_ms();
            self.start_tween(Tween::new(self.state.pose(), target, now, duration_ms));
        } else {
            self.cancel_animation();
            self.apply(target);
            self.schedule_notify();
        }
    }

    fn start_tween(&mut self, tween: Tween) {
        self.cancel_animation();
        tracing::trace!(target_zoom = tween.target().zoom, "starting camera animation");
        self.tween = Some(tween);
        self.state.is_animating = true;
        self.notify_after_tween = true;
    }

    /// Active pan anchors follow the camera so the next pan move continues from here.
    fn apply(&mut self, pose: CameraPose) {
        let shift = Point::new(pose.pan_x - self.state.pan_x, pose.pan_y - self.state.pan_y);
        if self.state.is_panning {
            self.pan_anchor = self.pan_anchor - shift;
            if let TouchGesture::Panning { anchor } = &mut self.gesture {
                *anchor = *anchor - shift;
            }
        }

        self.state.pan_x = pose.pan_x;
        self.state.pan_y = pose.pan_y;
        self.state.zoom = clamp_zoom(pose.zoom);
    }

    fn schedule_notify(&mut self) {
        let now = self.clock.now_ms();
        self.debouncer.schedule(now);
    }

    fn emit_bounds(&mut self) {
        let (width, height) = self.container;
        let bounds = self.world_bounds();
        if width <= 0.0 || height <= 0.0 || !bounds.is_finite() {
            tracing::debug!(width, height, "skipping viewport notification for degenerate bounds");
            return;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener(bounds);
        }
    }
}
