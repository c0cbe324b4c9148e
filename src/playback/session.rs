use std::path::Path;

use crate::{
    aggregate::{
        groups::{LocationGroup, group_events_by_location},
        marker::{LocationMarker, build_markers},
    },
    animation::{
        ease::Ease,
        scheduler::{Scheduler, TimerId},
        task::{AnimationKind, AnimationLock, AnimationTask},
    },
    foundation::{
        core::{LngLat, Millis},
        error::{GeostoryError, GeostoryResult},
    },
    playback::{
        effects::{PlaybackEffect, SceneFrame},
        keyboard::{Key, KeyAction, KeyContext, action_for},
        navigator::{Direction, GoTo, PlaybackState, Transition, arbitrate},
    },
    render::{
        camera::{CameraMove, fit_move, follow_move},
        highlight::{Highlight, PathHighlighter, SelectOutcome, restore},
        map::{LayerId, MapSurface, log_map_err},
        paths::PathRenderer,
    },
    settings::{
        config::PlaybackConfig,
        prefs::{PreferenceStore, Preferences},
        speed::{SpeedController, play_speed_label},
    },
    trajectory::{
        catalog::DatasetCatalog,
        gazetteer::Gazetteer,
        loader::load_trajectory,
        model::Trajectory,
    },
};

#[derive(Clone, Debug, PartialEq)]
enum Timer {
    AutoplayTick,
    AnimationSettled { index: usize },
    EraseFinished(LayerId),
    HighlightRevert,
    HighlightRestore(Highlight),
    OverlayReset,
}

/// One viewer: a trajectory, a map, and everything that animates between them.
///
/// Single-threaded. Every public entry point takes the current virtual time and first fires
/// all timers due by then, in deadline order. The clock never moves backwards; an earlier
/// `now` is treated as the latest time seen.
pub struct PlaybackSession<M: MapSurface> {
    cfg: PlaybackConfig,
    map: M,
    prefs: Box<dyn PreferenceStore>,
    trajectory: Option<Trajectory>,
    state: PlaybackState,
    camera_follow: bool,
    speed: SpeedController,
    scheduler: Scheduler<Timer>,
    lock: AnimationLock,
    settle_timer: Option<TimerId>,
    autoplay_timer: Option<TimerId>,
    highlight_timer: Option<TimerId>,
    overlay_timer: Option<TimerId>,
    message_cursor: usize,
    paths: PathRenderer,
    highlighter: PathHighlighter,
    groups: Vec<LocationGroup>,
    markers: Vec<LocationMarker>,
    effects: Vec<PlaybackEffect>,
    now: Millis,
}

impl<M: MapSurface> PlaybackSession<M> {
    /// Validate `cfg` and restore camera preferences from `prefs`. Nothing is loaded yet.
    pub fn new(
        map: M,
        cfg: PlaybackConfig,
        prefs: Box<dyn PreferenceStore>,
    ) -> GeostoryResult<Self> {
        cfg.validate()?;
        let stored = Preferences::load(prefs.as_ref());
        let speed = SpeedController::new(&cfg, stored.camera_speed_level);
        let lock = AnimationLock::new(cfg.lock_grace);
        Ok(Self {
            cfg,
            map,
            prefs,
            trajectory: None,
            state: PlaybackState::default(),
            camera_follow: stored.camera_follow,
            speed,
            scheduler: Scheduler::new(),
            lock,
            settle_timer: None,
            autoplay_timer: None,
            highlight_timer: None,
            overlay_timer: None,
            message_cursor: 0,
            paths: PathRenderer::new(),
            highlighter: PathHighlighter::new(),
            groups: Vec::new(),
            markers: Vec::new(),
            effects: Vec::new(),
            now: Millis::ZERO,
        })
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &PlaybackConfig {
        &self.cfg
    }

    /// The map surface.
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the map surface.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Loaded trajectory, if any.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Navigation state.
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Speed settings.
    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    /// Whether the camera follows each move.
    pub fn camera_follow(&self) -> bool {
        self.camera_follow
    }

    /// Location groups as of the current index.
    pub fn groups(&self) -> &[LocationGroup] {
        &self.groups
    }

    /// Location markers as of the current index.
    pub fn markers(&self) -> &[LocationMarker] {
        &self.markers
    }

    /// Drawn path segments.
    pub fn paths(&self) -> &PathRenderer {
        &self.paths
    }

    /// Event whose segment is highlighted.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighter.current_index()
    }

    /// Latest time seen on the virtual clock.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// True while the animation lock is held.
    pub fn is_animating(&self) -> bool {
        self.lock.is_busy(self.now)
    }

    /// Earliest pending timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.scheduler.next_deadline()
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Drain queued effects, oldest first.
    pub fn take_effects(&mut self) -> Vec<PlaybackEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Fire every timer due by `now`.
    pub fn advance(&mut self, now: Millis) {
        while let Some((at, _, timer)) = self.scheduler.pop_due(now) {
            self.now = self.now.max(at);
            self.fire(at, timer);
        }
        self.now = self.now.max(now);
    }

    /// Fire timers until none are left.
    pub fn run_until_idle(&mut self) {
        while let Some(at) = self.scheduler.next_deadline() {
            self.advance(at);
        }
    }

    fn fire(&mut self, at: Millis, timer: Timer) {
        match timer {
            Timer::AutoplayTick => {
                self.autoplay_timer = None;
                self.autoplay_tick(at);
            }
            Timer::AnimationSettled { index } => {
                self.settle_timer = None;
                self.lock.release();
                self.effects
                    .push(PlaybackEffect::AnimationSettled { index });
            }
            Timer::EraseFinished(layer) => {
                self.paths.finish_erase(&mut self.map, layer);
            }
            Timer::HighlightRevert => {
                self.highlight_timer = None;
                let replay = self.speed.path_duration();
                if self.highlighter.clear(&mut self.map, replay).is_some() {
                    self.effects
                        .push(PlaybackEffect::HighlightChanged { event_index: None });
                }
            }
            Timer::HighlightRestore(h) => self.restore_dimmed(&h),
            Timer::OverlayReset => {
                self.overlay_timer = None;
            }
        }
    }

    /// Replace the trajectory. Autoplay is stopped and every timer, layer and derived group
    /// is dropped before the new trajectory is installed and shown at index 0.
    #[tracing::instrument(skip(self, trajectory), fields(events = trajectory.len()))]
    pub fn load_trajectory(&mut self, now: Millis, trajectory: Trajectory) {
        self.advance(now);
        self.teardown();

        let events = trajectory.len();
        self.trajectory = Some(trajectory);
        self.state = PlaybackState::default();
        self.effects.push(PlaybackEffect::DatasetLoaded { events });
        self.go_to(now, 0, false, true);
        tracing::info!(events, "trajectory loaded");
    }

    /// Switch to dataset `id` of `catalog`, resolving its file against `base_dir`.
    ///
    /// Returns `Ok(false)` when `id` is already active. The file is read before anything is
    /// torn down, so a failed load leaves the current trajectory in place.
    pub fn switch_dataset(
        &mut self,
        now: Millis,
        catalog: &mut DatasetCatalog,
        id: &str,
        base_dir: &Path,
        gazetteer: &Gazetteer,
    ) -> GeostoryResult<bool> {
        if catalog.active().is_some_and(|d| d.id == id) {
            tracing::debug!(id, "dataset already active");
            return Ok(false);
        }
        let entry = catalog
            .datasets
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| GeostoryError::validation(format!("unknown dataset '{id}'")))?;
        let trajectory = load_trajectory(&base_dir.join(&entry.file), gazetteer)?;
        catalog.activate(id)?;
        self.load_trajectory(now, trajectory);
        Ok(true)
    }

    /// Cancel all timers, stop all animations and remove all layers.
    pub fn shutdown(&mut self, now: Millis) {
        self.advance(now);
        self.teardown();
        self.trajectory = None;
        self.state = PlaybackState::default();
        tracing::debug!("session shut down");
    }

    fn teardown(&mut self) {
        if self.state.is_playing {
            self.state.is_playing = false;
            self.effects
                .push(PlaybackEffect::PlayStateChanged { playing: false });
        }
        self.scheduler.clear();
        self.autoplay_timer = None;
        self.settle_timer = None;
        self.highlight_timer = None;
        self.overlay_timer = None;
        self.lock.release();
        self.highlighter.forget();
        self.paths.clear(&mut self.map);
        self.groups.clear();
        self.markers.clear();
    }

    /// Navigate to `index` (clamped). Returns whether the request was accepted.
    ///
    /// Non-user requests are rejected while a path animation holds the lock.
    #[tracing::instrument(skip(self, now), fields(now = now.0))]
    pub fn go_to(&mut self, now: Millis, index: usize, animated: bool, user_initiated: bool) -> bool {
        self.advance(now);
        let len = self.trajectory.as_ref().map_or(0, Trajectory::len);
        let req = GoTo {
            index,
            animated,
            user_initiated,
        };
        let Some(t) = arbitrate(&self.state, len, req, self.lock.is_busy(self.now)) else {
            return false;
        };
        self.apply_transition(t);
        true
    }

    /// Animated user step to the next event. False at the end.
    pub fn step_forward(&mut self, now: Millis) -> bool {
        self.advance(now);
        let Some(last) = self.trajectory.as_ref().map(Trajectory::last_index) else {
            return false;
        };
        if self.state.current_index >= last {
            return false;
        }
        self.go_to(now, self.state.current_index + 1, true, true)
    }

    /// Animated user step to the previous event. False at the start.
    pub fn step_backward(&mut self, now: Millis) -> bool {
        self.advance(now);
        if self.trajectory.is_none() || self.state.current_index == 0 {
            return false;
        }
        self.go_to(now, self.state.current_index - 1, true, true)
    }

    fn apply_transition(&mut self, t: Transition) {
        self.drop_highlight();

        let Some(traj) = self.trajectory.as_ref() else {
            return;
        };
        let now = self.now;
        let path_duration = self.speed.path_duration();

        self.state.previous_index = t.from;
        self.state.current_index = t.to;
        self.state.direction = t.direction;
        self.effects.push(PlaybackEffect::IndexChanged {
            index: t.to,
            previous: t.from,
            direction: t.direction,
        });

        self.groups = group_events_by_location(traj, t.to);
        self.markers = build_markers(&self.groups, traj.get(t.to));
        self.effects.push(PlaybackEffect::MarkersUpdated {
            count: self.markers.len(),
            current: self.markers.iter().find(|m| m.is_current).map(|m| m.coordinates),
        });

        let task = match (t.animate, t.direction) {
            (true, Direction::Forward) => {
                let drawn = self
                    .paths
                    .render_forward(&mut self.map, traj, t.to, path_duration, now);
                Some(drawn.unwrap_or(AnimationTask {
                    target: t.to,
                    kind: AnimationKind::Draw,
                    started_at: now,
                    duration: path_duration,
                    ease: Ease::InOutQuart,
                }))
            }
            (true, _) => {
                let erased = self.paths.render_backward(&mut self.map, t.to, path_duration);
                for layer in erased {
                    self.scheduler
                        .schedule(now + path_duration, Timer::EraseFinished(layer));
                }
                Some(AnimationTask {
                    target: t.to,
                    kind: AnimationKind::Erase,
                    started_at: now,
                    duration: path_duration,
                    ease: Ease::InOutQuart,
                })
            }
            (false, _) => {
                self.paths.render_static(&mut self.map, traj, t.to);
                None
            }
        };
        self.effects.push(PlaybackEffect::PathsUpdated {
            segments: self.paths.len(),
            active: self.paths.active(),
        });

        if let Some(old) = self.settle_timer.take() {
            self.scheduler.cancel(old);
        }
        match task {
            Some(task) => {
                let release_at = self.lock.acquire(task);
                self.settle_timer = Some(
                    self.scheduler
                        .schedule(release_at, Timer::AnimationSettled { index: t.to }),
                );
            }
            // A static redraw interrupts whatever was animating.
            None => {
                self.lock.release();
            }
        }

        if self.camera_follow {
            let planned = follow_move(
                traj,
                t.to,
                t.from,
                t.animate_camera,
                self.map.current_zoom(),
                &self.speed,
                &self.cfg,
            );
            match planned {
                Ok(Some(mv)) => self.move_camera(mv),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, index = t.to, "camera follow skipped"),
            }
        }
    }

    fn move_camera(&mut self, mv: CameraMove) {
        if log_map_err("camera", mv.apply(&mut self.map)).is_some() {
            self.effects.push(PlaybackEffect::CameraMoved(mv));
        }
    }

    /// Start or stop autoplay. Starting takes a step immediately.
    pub fn toggle_play(&mut self, now: Millis) {
        self.advance(now);
        if self.state.is_playing {
            self.stop_autoplay();
        } else {
            self.start_autoplay();
        }
    }

    /// True while autoplaying.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    fn start_autoplay(&mut self) {
        if self.trajectory.is_none() {
            return;
        }
        self.state.is_playing = true;
        self.effects
            .push(PlaybackEffect::PlayStateChanged { playing: true });
        self.autoplay_tick(self.now);
    }

    fn stop_autoplay(&mut self) {
        if let Some(id) = self.autoplay_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.state.is_playing {
            self.state.is_playing = false;
            self.effects
                .push(PlaybackEffect::PlayStateChanged { playing: false });
        }
    }

    /// One autoplay step taken at `at`. Stops once the last index is shown.
    fn autoplay_tick(&mut self, at: Millis) {
        if !self.state.is_playing {
            return;
        }
        let Some(last) = self.trajectory.as_ref().map(Trajectory::last_index) else {
            return;
        };
        if self.state.current_index >= last {
            self.stop_autoplay();
            return;
        }

        let next = self.state.current_index + 1;
        let req = GoTo::auto(next);
        let len = last + 1;
        match arbitrate(&self.state, len, req, self.lock.is_busy(at)) {
            Some(t) => self.apply_transition(t),
            None => tracing::debug!(next, "autoplay step skipped while animating"),
        }

        if self.state.current_index >= last {
            self.stop_autoplay();
            return;
        }
        let wait = self.speed.autoplay_interval(self.cfg.autoplay_grace);
        self.autoplay_timer = Some(self.scheduler.schedule(at + wait, Timer::AutoplayTick));
    }

    /// Start a slider drag. Moves during the drag redraw statically.
    pub fn begin_drag(&mut self, now: Millis) {
        self.advance(now);
        self.state.is_dragging = true;
    }

    /// Scrub to `index` while dragging: static redraw, camera jumps.
    pub fn drag_to(&mut self, now: Millis, index: usize) -> bool {
        self.advance(now);
        let animated = !self.state.is_dragging;
        self.go_to(now, index, animated, true)
    }

    /// Release the slider at `index`; animates only if it differs from the shown index.
    pub fn end_drag(&mut self, now: Millis, index: usize) -> bool {
        self.advance(now);
        if !self.state.is_dragging {
            return false;
        }
        self.state.is_dragging = false;
        if index == self.state.current_index {
            return false;
        }
        self.go_to(now, index, true, true)
    }

    /// Stop autoplay, jump to the last event and fit every visible marker.
    pub fn show_full_route(&mut self, now: Millis) {
        self.advance(now);
        let Some(last) = self.trajectory.as_ref().map(Trajectory::last_index) else {
            return;
        };
        self.stop_autoplay();
        self.go_to(now, last, false, true);

        let coords: Vec<LngLat> = self.markers.iter().map(|m| m.coordinates).collect();
        match fit_move(&coords, self.speed.camera_follow(), &self.cfg) {
            Ok(Some(mv)) => self.move_camera(mv),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "full route fit skipped"),
        }
    }

    /// Change the autoplay interval. A running autoplay restarts immediately.
    pub fn set_play_speed(&mut self, now: Millis, speed: Millis) -> GeostoryResult<()> {
        self.advance(now);
        if speed.is_zero() {
            return Err(GeostoryError::validation("play speed must be non-zero"));
        }
        self.speed.set_play_speed(speed);
        self.push_settings();
        if self.state.is_playing {
            self.stop_autoplay();
            self.start_autoplay();
        }
        Ok(())
    }

    /// Override the path draw duration until the next speed change.
    pub fn set_path_duration(&mut self, now: Millis, duration: Millis) -> GeostoryResult<()> {
        self.advance(now);
        if duration.is_zero() {
            return Err(GeostoryError::validation("path duration must be non-zero"));
        }
        self.speed.set_path_duration(duration);
        self.push_settings();
        Ok(())
    }

    /// Select a camera speed level and persist it. Invalid levels are logged and ignored.
    pub fn set_camera_speed_level(&mut self, now: Millis, level: usize) -> bool {
        self.advance(now);
        if !self.speed.set_level(level) {
            return false;
        }
        Preferences::save_speed_level(self.prefs.as_mut(), level);
        self.push_settings();
        true
    }

    /// Flip camera follow and persist it. Returns the new value.
    pub fn toggle_camera_follow(&mut self, now: Millis) -> bool {
        self.advance(now);
        self.camera_follow = !self.camera_follow;
        Preferences::save_camera_follow(self.prefs.as_mut(), self.camera_follow);
        self.push_settings();
        self.camera_follow
    }

    fn push_settings(&mut self) {
        self.effects.push(PlaybackEffect::SettingsChanged {
            play_speed: self.speed.play_speed(),
            path_duration: self.speed.path_duration(),
            camera_speed_level: self.speed.level(),
            camera_follow: self.camera_follow,
        });
    }

    /// Toggle the attention highlight on the segment of `event_index`.
    pub fn select_event_highlight(&mut self, now: Millis, event_index: usize) {
        self.advance(now);
        if self
            .trajectory
            .as_ref()
            .is_none_or(|t| event_index >= t.len())
        {
            return;
        }
        let segment = self
            .paths
            .layer_for(event_index)
            .zip(self.paths.role_of(event_index))
            .map(|(layer, role)| (layer, role.style()));
        let replay = self.speed.path_duration();
        let outcome = self.highlighter.select(
            &mut self.map,
            event_index,
            segment,
            replay,
            self.cfg.highlight_dim_factor,
        );

        match outcome {
            SelectOutcome::Missing => return,
            SelectOutcome::Cleared => {}
            SelectOutcome::Highlighted { dimmed } => {
                if let Some(d) = dimmed {
                    self.scheduler.schedule(
                        self.now + self.cfg.highlight_quick_clear,
                        Timer::HighlightRestore(d),
                    );
                }
            }
        }

        if let Some(id) = self.highlight_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.highlighter.current().is_some() {
            self.highlight_timer = Some(self.scheduler.schedule(
                self.now + self.cfg.highlight_duration,
                Timer::HighlightRevert,
            ));
            if self.camera_follow {
                let pts = self.paths.points_of(event_index).unwrap_or_default();
                match fit_move(pts, self.speed.camera_follow(), &self.cfg) {
                    Ok(Some(mv)) => self.move_camera(mv),
                    Ok(None) => {}
                    Err(e) => tracing::warn!(error = %e, "highlight focus skipped"),
                }
            }
        }
        self.effects.push(PlaybackEffect::HighlightChanged {
            event_index: self.highlighter.current_index(),
        });
    }

    fn restore_dimmed(&mut self, h: &Highlight) {
        let still_drawn = self.paths.contains_layer(h.layer);
        let rehighlighted = self.highlighter.current().is_some_and(|c| c.layer == h.layer);
        if still_drawn && !rehighlighted {
            restore(&mut self.map, h, self.speed.path_duration());
        }
    }

    /// Undo any highlight before the paths change under it.
    fn drop_highlight(&mut self) {
        for h in self
            .scheduler
            .cancel_where(|t| matches!(t, Timer::HighlightRestore(_)))
        {
            if let Timer::HighlightRestore(h) = h {
                self.restore_dimmed(&h);
            }
        }
        if let Some(id) = self.highlight_timer.take() {
            self.scheduler.cancel(id);
        }
        if self.highlighter.current().is_some() {
            self.highlighter.clear(&mut self.map, Millis::ZERO);
            self.effects
                .push(PlaybackEffect::HighlightChanged { event_index: None });
        }
    }

    /// Apply a key press. Keys are ignored while unloaded or when `ctx` swallows them.
    pub fn handle_key(&mut self, now: Millis, key: Key, ctx: KeyContext) {
        self.advance(now);
        if self.trajectory.is_none() {
            return;
        }
        let Some(action) = action_for(key, ctx) else {
            return;
        };
        match action {
            KeyAction::StepBackward => {
                self.step_backward(now);
            }
            KeyAction::StepForward => {
                self.step_forward(now);
            }
            KeyAction::JumpToStart => {
                self.stop_autoplay();
                self.go_to(now, 0, true, true);
            }
            KeyAction::TogglePlay => self.toggle_play(now),
            KeyAction::DecorativeMessage => self.show_decorative_message(),
        }
    }

    /// Emit the next decorative message unless one is still showing.
    fn show_decorative_message(&mut self) {
        if self.overlay_timer.is_some() {
            tracing::debug!("decorative message already showing");
            return;
        }
        let msgs = &self.cfg.decorative_messages;
        if msgs.is_empty() {
            return;
        }
        let text = msgs[self.message_cursor % msgs.len()].clone();
        self.message_cursor += 1;
        self.effects.push(PlaybackEffect::DecorativeMessage { text });
        self.overlay_timer = Some(
            self.scheduler
                .schedule(self.now + self.cfg.overlay_reset, Timer::OverlayReset),
        );
    }

    /// Snapshot the scene at `now`.
    pub fn frame(&mut self, now: Millis) -> SceneFrame {
        self.advance(now);
        let total = self.trajectory.as_ref().map_or(0, Trajectory::len);
        let index = self.state.current_index;
        SceneFrame {
            index,
            previous_index: self.state.previous_index,
            total_events: total,
            progress: if total == 0 {
                0.0
            } else {
                (index + 1) as f64 / total as f64
            },
            event: self.trajectory.as_ref().and_then(|t| t.get(index)).cloned(),
            markers: self.markers.clone(),
            segments: self.paths.views(),
            highlight: self.highlighter.current_index(),
            is_playing: self.state.is_playing,
            is_dragging: self.state.is_dragging,
            is_animating: self.lock.is_busy(self.now),
            camera_follow: self.camera_follow,
            play_speed: self.speed.play_speed(),
            play_speed_label: play_speed_label(self.speed.play_speed()),
            path_duration: self.speed.path_duration(),
            camera_speed_label: self.speed.level_label(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
