use foundation::math::{Vec2, Vec3, lat_lon_to_vec3, surface_rotation};
use foundation::time::Duration;
use runtime::{Delay, Event, EventBus, Frame, FrameClock, Scheduler, TickSummary};
use scene::{
    Bodies, Body, CameraTransition, InputAction, InputAdapter, MoonFormation, OrbitCamera,
    OrbitLimits, PointerKind, pick_nearest,
};
use serde::Serialize;
use timeline::{
    Navigator, NodePath, PRESENT_POSITION, PlaybackItem, Timeline, TimelineError, TimelineLabel,
    format_year, preview_needed, update_display,
};
use tracing::{debug, info, warn};

use crate::config::ArchiveConfig;
use crate::error::ArchiveError;
use crate::focus::{CameraMove, FocusOutcome};
use crate::layers::{Layer, LayerStates};
use crate::playback::{PLAYBACK_TIMER, PlaybackDriver};
use crate::stage::{EventPin, Stage, StageNotice};
use crate::ui::{BodyInfo, DetailPanel, Marker, PanelView, Scrubber};

/// What happened, stamped per frame for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArchiveEvent {
    NodeShown { id: String },
    LevelChanged { label: String, depth: usize },
    PanelClosed,
    ResetToPresent,
    FocusRequested { body: Body, outcome: FocusOutcome },
    CameraMoveStarted { started: CameraMove },
    CameraMoveFinished { finished: CameraMove },
    LayerToggled { layer: Layer, on: bool },
    PlaybackStarted,
    PlaybackStopped,
    MoonFormationStarted,
    MoonFormationFinished,
}

/// Result of activating one of the displayed node's events.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventActivation {
    MoonFormation { started: bool },
    Located { lat: f64, lon: f64 },
    Global,
}

/// Ties timeline navigation, the Earth/Moon stage and the UI together.
///
/// All input enters through `&mut self` methods and all time passes through
/// [`Archive::tick`]; animations only touch the [`Stage`] and report back
/// through its notices.
pub struct Archive<U> {
    config: ArchiveConfig,
    navigator: Navigator,
    stage: Stage,
    scheduler: Scheduler<Stage>,
    input: InputAdapter,
    playback: PlaybackDriver,
    clock: FrameClock,
    frame: Frame,
    events: EventBus<ArchiveEvent>,
    ui: U,
    slider: f64,
    viewport: Vec2,
}

impl<U: DetailPanel + Scrubber> Archive<U> {
    pub fn new(config: ArchiveConfig, timeline: Timeline, ui: U) -> Self {
        let layers = LayerStates::from_config(&config.layers);
        let home_radius = home_radius(&config, &layers);
        let camera = OrbitCamera::new(Vec3::new(0.0, 0.0, home_radius), Vec3::ZERO, config.camera.limits())
            .with_fov(config.camera.fov_y_deg);
        let mut bodies = Bodies::new(
            config.bodies.body_config(),
            config.thresholds.visibility(),
            config.playback.present_year,
        );
        bodies.set_city_lights_layer(layers.city_lights);
        bodies.set_surface("presentday");

        info!(
            nodes = timeline.node_count(),
            present_year = config.playback.present_year,
            "archive ready"
        );

        let mut archive = Self {
            input: InputAdapter::new(config.input_config()),
            playback: PlaybackDriver::new(&timeline),
            navigator: Navigator::new(timeline),
            stage: Stage::new(camera, bodies, layers),
            scheduler: Scheduler::new(),
            clock: FrameClock::new(),
            frame: Frame::first(),
            events: EventBus::new(),
            ui,
            slider: PRESENT_POSITION,
            viewport: Vec2::new(1280.0, 720.0),
            config,
        };
        archive.refresh_markers();
        archive.ui.set_position(PRESENT_POSITION);
        let label = archive.present_label();
        archive.ui.set_label(&label);
        archive
    }

    /// Default configuration over the built-in Earth timeline.
    pub fn earth(ui: U) -> Result<Self, ArchiveError> {
        Ok(Self::new(ArchiveConfig::default(), Timeline::earth()?, ui))
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn playback(&self) -> &PlaybackDriver {
        &self.playback
    }

    pub fn slider(&self) -> f64 {
        self.slider
    }

    pub fn events(&self) -> &[Event<ArchiveEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<ArchiveEvent>> {
        self.events.drain()
    }

    // --- scrubber -------------------------------------------------------

    /// Live slider drag: updates the label only.
    pub fn slider_input(&mut self, position: f64) {
        self.slider = position.clamp(0.0, 100.0);
        match self.navigator.peek_at(self.slider) {
            Ok(node) => {
                let label = update_display(node, false);
                self.ui.set_label(&label);
            }
            Err(err) => debug!(%err, "slider over an empty level"),
        }
    }

    /// Slider released: shows the nearest item of the scrubber level.
    pub fn slider_release(&mut self, position: f64) -> Result<(), TimelineError> {
        self.slider = position.clamp(0.0, 100.0);
        let path = self.navigator.path_at(self.slider)?;
        self.show_node(path)
    }

    /// Hover preview. Returns whether a preview label was shown.
    pub fn hover(&mut self, position: f64) -> bool {
        let threshold = self.config.input.preview_threshold;
        if !preview_needed(position, self.slider, threshold) {
            return false;
        }
        match self.navigator.peek_at(position) {
            Ok(node) => {
                let label = update_display(node, true);
                self.ui.set_label(&label);
                true
            }
            Err(_) => false,
        }
    }

    pub fn hover_end(&mut self) {
        let label = self.resting_label();
        self.ui.set_label(&label);
    }

    // --- navigation -----------------------------------------------------

    pub fn drill_down(&mut self, child_id: &str) -> Result<(), TimelineError> {
        self.navigator.drill_down(child_id)?;
        let path = self
            .navigator
            .displayed_path()
            .cloned()
            .ok_or(TimelineError::NothingDisplayed)?;
        self.emit_level_changed();
        self.show_node(path)
    }

    /// Breadcrumb click: back up to level `index` and close the panel.
    pub fn navigate_to_level(&mut self, index: usize) -> Result<(), TimelineError> {
        self.navigator.navigate_to_ancestor(index)?;
        self.ui.set_breadcrumb(&self.navigator.breadcrumb());
        self.close_detail();
        self.emit_level_changed();
        Ok(())
    }

    pub fn return_to_present(&mut self) {
        self.stop_playback();
        self.navigator.reset_to_present();
        self.slider = PRESENT_POSITION;

        let present = self.config.playback.present_year;
        let bodies = &mut self.stage.bodies;
        bodies.set_surface("presentday");
        bodies.apply_timeline_year(present);
        self.stage.pin = None;

        self.ui.close();
        self.ui.set_breadcrumb(&self.navigator.breadcrumb());
        self.ui.set_position(PRESENT_POSITION);
        let label = self.present_label();
        self.ui.set_label(&label);
        self.refresh_markers();
        self.emit(ArchiveEvent::ResetToPresent);
    }

    pub fn close_panel(&mut self) {
        self.navigator.close();
        self.close_detail();
    }

    /// Panel teardown shared by every path that stops showing a node.
    fn close_detail(&mut self) {
        self.stage.pin = None;
        self.ui.close();
        self.refresh_markers();
        self.emit(ArchiveEvent::PanelClosed);
    }

    fn show_node(&mut self, path: NodePath) -> Result<(), TimelineError> {
        let node = self.navigator.show(path)?;
        let view = PanelView::from_node(node);
        let label = update_display(node, false);
        let year = node.year_start;

        let bodies = &mut self.stage.bodies;
        bodies.set_surface(&view.id);
        bodies.apply_timeline_year(year);
        self.stage.pin = None;

        self.ui.open(&view);
        self.ui.set_breadcrumb(&self.navigator.breadcrumb());
        self.ui.set_label(&label);
        self.refresh_markers();
        self.emit(ArchiveEvent::NodeShown { id: view.id });

        if self.stage.focus.body() == Body::Moon && !self.stage.bodies.moon.body.visible {
            debug!("moon hidden at this time, returning to Earth");
            self.request_focus(Body::Earth);
        }
        Ok(())
    }

    // --- events and bodies ----------------------------------------------

    /// Acts on event `index` of the displayed node.
    pub fn activate_event(&mut self, index: usize) -> Result<EventActivation, TimelineError> {
        let node = self.navigator.displayed().ok_or(TimelineError::NothingDisplayed)?;
        let event = node.events.get(index).ok_or(TimelineError::UnknownEvent { index })?;

        if event.is_moon_formation() {
            let started = self.trigger_moon_formation();
            return Ok(EventActivation::MoonFormation { started });
        }

        let Some((lat, lon)) = event.coordinates() else {
            debug!(event = %event.name, "global event has no surface location");
            return Ok(EventActivation::Global);
        };

        let name = event.name.clone();
        let rotation = surface_rotation(lat, lon);
        let earth = &mut self.stage.bodies.earth.body;
        earth.rotation.x = rotation.rot_x;
        earth.rotation.y = rotation.rot_y;
        let local_position = lat_lon_to_vec3(lat, lon, earth.radius);
        info!(event = %name, lat, lon, "event located");
        self.stage.pin = Some(EventPin { name, local_position });
        Ok(EventActivation::Located { lat, lon })
    }

    /// Starts the Moon-formation sequence. Refused while one is running and
    /// unless the camera rests on Earth.
    pub fn trigger_moon_formation(&mut self) -> bool {
        if self.scheduler.is_running(MoonFormation::LABEL) {
            debug!("moon formation already running");
            return false;
        }
        if self.stage.focus.body() != Body::Earth || self.stage.focus.is_transitioning() {
            debug!(focus = ?self.stage.focus, "moon formation needs a settled Earth view");
            return false;
        }
        let formation = MoonFormation::begin(self.config.formation.formation_config(), &mut self.stage.bodies);
        self.scheduler.start(Box::new(formation));
        self.emit(ArchiveEvent::MoonFormationStarted);
        true
    }

    pub fn request_focus(&mut self, body: Body) -> FocusOutcome {
        let outcome = if body == Body::Moon && !self.stage.bodies.moon.body.visible {
            FocusOutcome::Unavailable
        } else {
            self.stage.focus.request(body)
        };
        match outcome {
            FocusOutcome::Started => {
                info!(?body, "focus transition");
                self.start_focus_transition(body);
            }
            FocusOutcome::AlreadyFocused => debug!(?body, "already focused"),
            FocusOutcome::Dropped => debug!(?body, "camera busy, focus request dropped"),
            FocusOutcome::Unavailable => debug!(?body, "moon hidden, focus request refused"),
        }
        self.emit(ArchiveEvent::FocusRequested { body, outcome });
        outcome
    }

    fn start_focus_transition(&mut self, body: Body) {
        let t = self.config.transitions.clone();
        let duration = Duration::from_millis(t.focus_ms);
        let (to_eye, to_look_at) = match body {
            Body::Moon => {
                let position = Vec3::from(t.moon_focus_position);
                let moon = &mut self.stage.bodies;
                moon.set_moon_orbit_paused(true);
                moon.moon.body.position = position;
                moon.moon.body.scale = t.moon_focus_scale;

                self.stage.camera.set_limits(moon_limits(&self.config));
                self.stage.camera.retarget(position);
                self.ui.open_body(&BodyInfo::moon());
                self.ui.set_theme(Body::Moon);
                (position + Vec3::new(0.0, 0.0, t.moon_focus_offset), position)
            }
            Body::Earth => {
                let bodies = &mut self.stage.bodies;
                bodies.set_moon_orbit_paused(false);
                bodies.moon.body.scale = 1.0;

                self.stage.camera.set_limits(self.config.camera.limits());
                self.stage.camera.retarget(Vec3::ZERO);
                self.ui.close();
                self.ui.set_theme(Body::Earth);
                let radius = home_radius(&self.config, &self.stage.layers);
                (Vec3::new(0.0, 0.0, radius), Vec3::ZERO)
            }
        };

        let transition = CameraTransition::new(&self.stage.camera, to_eye, to_look_at, duration)
            .on_complete(|stage: &mut Stage| stage.finish_camera_move());
        self.scheduler.start(Box::new(transition));
        self.emit(ArchiveEvent::CameraMoveStarted {
            started: CameraMove::Focus(body),
        });
    }

    // --- layers and playback --------------------------------------------

    /// Flips `layer` and returns its new state.
    pub fn toggle_layer(&mut self, layer: Layer) -> bool {
        let on = !self.stage.layers.get(layer);
        self.stage.layers.set(layer, on);
        match layer {
            Layer::CityLights => self.stage.bodies.set_city_lights_layer(on),
            Layer::Satellites => {
                let radius = home_radius(&self.config, &self.stage.layers);
                self.zoom_to(radius);
            }
        }
        info!(?layer, on, "layer toggled");
        self.emit(ArchiveEvent::LayerToggled { layer, on });
        on
    }

    fn zoom_to(&mut self, radius: f64) {
        if self.stage.focus.body() != Body::Earth {
            debug!(radius, "layer zoom skipped away from Earth");
            return;
        }
        if !self.stage.focus.begin_zoom() {
            debug!(radius, "camera busy, layer zoom dropped");
            return;
        }
        let duration = Duration::from_millis(self.config.transitions.layer_zoom_ms);
        let transition = CameraTransition::to_radius(&self.stage.camera, radius, duration)
            .on_complete(|stage: &mut Stage| stage.finish_camera_move());
        self.scheduler.start(Box::new(transition));
        self.emit(ArchiveEvent::CameraMoveStarted {
            started: CameraMove::Zoom,
        });
    }

    /// Starts or stops chronological playback. Returns whether it now plays.
    pub fn toggle_playback(&mut self) -> bool {
        if self.playback.is_playing() {
            self.stop_playback();
            return false;
        }
        let Some(item) = self.playback.start(self.config.playback.present_year).cloned() else {
            warn!("playback queue is empty");
            return false;
        };
        info!(from = %item.id, "playback started");
        self.emit(ArchiveEvent::PlaybackStarted);
        self.play_item(item);
        true
    }

    fn play_item(&mut self, item: PlaybackItem) {
        self.ui.set_playback(Some(item.value));
        if let Err(err) = self.show_node(item.path) {
            warn!(%err, id = %item.id, "playback item could not be shown");
        }
        let dwell = self.config.playback.dwell.for_year(item.year_start);
        self.scheduler.start(Box::new(Delay::from_millis(PLAYBACK_TIMER, dwell)));
    }

    fn stop_playback(&mut self) {
        if !self.playback.is_playing() {
            return;
        }
        self.scheduler.cancel_label(PLAYBACK_TIMER, &mut self.stage);
        self.playback.stop();
        self.ui.set_playback(None);
        info!("playback stopped");
        self.emit(ArchiveEvent::PlaybackStopped);
    }

    // --- input ----------------------------------------------------------

    /// Host viewport size in CSS pixels; narrow viewports get the compact Earth.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
        let settings = &self.config.bodies;
        self.stage.bodies.earth.body.radius = if width < self.config.input.compact_width_px {
            settings.compact_earth_radius
        } else {
            settings.earth_radius
        };
    }

    pub fn pointer_down(&mut self, id: i32, kind: PointerKind, x: f64, y: f64) {
        self.input.pointer_down(id, kind, Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64) {
        if let Some(action) = self.input.pointer_move(id, Vec2::new(x, y)) {
            self.apply_input(action);
        }
    }

    /// Pointer release; a click picks a body and may request focus.
    pub fn pointer_up(&mut self, id: i32, x: f64, y: f64) -> Option<FocusOutcome> {
        let action = self.input.pointer_up(id, Vec2::new(x, y))?;
        self.apply_input(action)
    }

    pub fn pointer_cancel(&mut self, id: i32) {
        self.input.pointer_cancel(id);
    }

    pub fn wheel(&mut self, delta: f64) {
        let action = self.input.wheel(delta);
        self.apply_input(action);
    }

    fn apply_input(&mut self, action: InputAction) -> Option<FocusOutcome> {
        let busy = self.stage.focus.is_transitioning();
        match action {
            InputAction::Orbit { dx, dy } if !busy => self.stage.camera.apply_delta(-dx, dy),
            InputAction::Zoom { delta } if !busy => self.stage.camera.apply_zoom_delta(delta),
            InputAction::Orbit { .. } | InputAction::Zoom { .. } => {}
            InputAction::RotateBody { dx, dy } => {
                let body = self.stage.focus.body();
                self.stage.bodies.rotate(body, dx, dy);
            }
            InputAction::Click { x, y } => return self.click(x, y),
        }
        None
    }

    fn click(&mut self, x: f64, y: f64) -> Option<FocusOutcome> {
        if self.stage.focus.is_transitioning() {
            debug!("click ignored during camera move");
            return None;
        }
        let ndc = Vec2::new(x / self.viewport.x * 2.0 - 1.0, 1.0 - y / self.viewport.y * 2.0);
        let ray = self.stage.camera.ray_through(ndc, self.viewport.x / self.viewport.y);
        let hit = pick_nearest(ray, &self.stage.bodies.pick_candidates())?;
        Some(self.request_focus(hit.target))
    }

    // --- time -----------------------------------------------------------

    /// Host animation-frame callback with a millisecond timestamp.
    pub fn frame(&mut self, now_ms: f64) -> TickSummary {
        let frame = self.clock.tick(now_ms);
        self.step(frame.dt_s)
    }

    /// Advances the world by `dt_s` seconds.
    pub fn tick(&mut self, dt_s: f64) -> TickSummary {
        self.step(dt_s)
    }

    fn step(&mut self, dt_s: f64) -> TickSummary {
        self.frame = self.frame.advance(dt_s);
        self.stage.bodies.update(self.frame.dt_s, self.input.is_dragging());
        let summary = self.scheduler.tick(self.frame, &mut self.stage);

        for notice in self.stage.take_notices() {
            match notice {
                StageNotice::CameraMoveFinished(finished) => {
                    debug!(?finished, "camera move finished");
                    self.emit(ArchiveEvent::CameraMoveFinished { finished });
                }
            }
        }
        if summary.completed_label(MoonFormation::LABEL) {
            info!("moon formation finished");
            self.emit(ArchiveEvent::MoonFormationFinished);
        }
        if summary.completed_label(PLAYBACK_TIMER) && self.playback.is_playing() {
            match self.playback.step().cloned() {
                Some(item) => self.play_item(item),
                None => {
                    self.ui.set_playback(None);
                    info!("playback finished");
                    self.emit(ArchiveEvent::PlaybackStopped);
                }
            }
        }
        summary
    }

    // --- helpers --------------------------------------------------------

    fn present_label(&self) -> TimelineLabel {
        let year = format_year(self.config.playback.present_year);
        TimelineLabel::new(format!("Present Day - {year}"), false)
    }

    fn resting_label(&self) -> TimelineLabel {
        if let Some(node) = self.navigator.displayed() {
            return update_display(node, false);
        }
        if self.navigator.depth() == 0 && self.slider >= PRESENT_POSITION {
            return self.present_label();
        }
        match self.navigator.peek_at(self.slider) {
            Ok(node) => update_display(node, false),
            Err(_) => self.present_label(),
        }
    }

    fn refresh_markers(&mut self) {
        let active = self.navigator.displayed().map(|n| n.id.clone());
        let markers: Vec<Marker> = self
            .navigator
            .scrubber_items()
            .iter()
            .map(|node| Marker {
                id: node.id.clone(),
                name: node.name.clone(),
                value: node.value,
                active: active.as_deref() == Some(node.id.as_str()),
            })
            .collect();
        self.ui.set_markers(&markers);
    }

    fn emit_level_changed(&mut self) {
        let label = self.navigator.current_level().label.clone();
        let depth = self.navigator.depth();
        info!(%label, depth, "level changed");
        self.emit(ArchiveEvent::LevelChanged { label, depth });
    }

    fn emit(&mut self, event: ArchiveEvent) {
        self.events.emit(self.frame, event);
    }
}

/// Earth orbit radius for the current layers: low orbit while satellites show.
fn home_radius(config: &ArchiveConfig, layers: &LayerStates) -> f64 {
    if layers.satellites {
        config.camera.leo_radius
    } else {
        config.camera.orbit_radius
    }
}

fn moon_limits(config: &ArchiveConfig) -> OrbitLimits {
    OrbitLimits {
        min_radius: config.transitions.moon_min_radius,
        max_radius: config.transitions.moon_max_radius,
        ..config.camera.limits()
    }
}
