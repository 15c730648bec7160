use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use topograph_core::{EdgeId, EdgeStyle};

/// Dash-offset step per frame and the wrap period for marching ants.
pub const ANTS_PHASE_STEP: f32 = 1.0;
pub const ANTS_PHASE_PERIOD: f32 = 20.0;
/// Flow-pulse lifetime, ~3s at 30fps.
pub const PULSE_DURATION_FRAMES: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    MarchingAnts,
    FlowPulse,
}

#[derive(Debug)]
struct AnimationTask {
    kind: AnimationKind,
    target_edges: Vec<EdgeId>,
    start_frame: u64,
    duration_frames: Option<u32>,
    /// Per-edge style snapshot taken at task start; immutable for the
    /// task's lifetime and replayed verbatim on completion or cancel.
    saved: HashMap<EdgeId, EdgeStyle>,
}

/// What the renderer needs for the current frame.
#[derive(Debug, Clone, Default)]
pub struct FrameParams {
    /// Shared dash offset for all marching-ants edges.
    pub dash_offset: f32,
    pub ants_edges: Vec<EdgeId>,
    /// Transient per-edge style overrides (flow pulses in flight).
    pub overrides: HashMap<EdgeId, EdgeStyle>,
}

/// Stops future ticks of the host frame loop. One token per engine
/// instance, never shared at module level.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Frame-driven scheduler owned by one engine instance. The host drives
/// `advance_frame` only while `is_active()`; each tick runs after the
/// previous one, so ticks never overlap.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    frame: u64,
    phase: f32,
    tasks: Vec<AnimationTask>,
    token: CancelToken,
}

fn pulse_style(base: &EdgeStyle) -> EdgeStyle {
    EdgeStyle {
        stroke: "#ffcc00".to_string(),
        width: base.width + 1.5,
        dash: Some([6.0, 3.0]),
    }
}

impl AnimationScheduler {
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.tasks.is_empty() && !self.token.is_cancelled()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Unbounded task over the emphasized edge set; lives until the
    /// selection changes.
    pub fn start_marching_ants(&mut self, targets: Vec<EdgeId>) {
        if targets.is_empty() {
            return;
        }
        self.tasks.push(AnimationTask {
            kind: AnimationKind::MarchingAnts,
            target_edges: targets,
            start_frame: self.frame,
            duration_frames: None,
            saved: HashMap::new(),
        });
    }

    /// One-shot downstream pulse. Snapshots the targeted edges' current
    /// styles before the first mutation.
    pub fn start_flow_pulse(&mut self, targets: Vec<EdgeId>, styles: &HashMap<EdgeId, EdgeStyle>) {
        if targets.is_empty() {
            return;
        }
        let mut saved = HashMap::new();
        for eid in &targets {
            if let Some(style) = styles.get(eid) {
                saved.insert(eid.clone(), style.clone());
            }
        }
        self.tasks.push(AnimationTask {
            kind: AnimationKind::FlowPulse,
            target_edges: targets,
            start_frame: self.frame,
            duration_frames: Some(PULSE_DURATION_FRAMES),
            saved,
        });
    }

    /// Advances one frame. Expired pulses restore their snapshot into
    /// `styles` before being dropped.
    pub fn advance_frame(&mut self, styles: &mut HashMap<EdgeId, EdgeStyle>) -> FrameParams {
        if self.token.is_cancelled() {
            self.cancel_all(styles);
            return FrameParams::default();
        }

        self.frame += 1;
        let mut params = FrameParams::default();
        let mut any_ants = false;

        let mut kept = Vec::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            match task.kind {
                AnimationKind::MarchingAnts => {
                    any_ants = true;
                    params.ants_edges.extend(task.target_edges.iter().cloned());
                    kept.push(task);
                }
                AnimationKind::FlowPulse => {
                    let elapsed = self.frame.saturating_sub(task.start_frame);
                    let duration = u64::from(task.duration_frames.unwrap_or(0));
                    if elapsed >= duration {
                        restore(&task, styles);
                        continue;
                    }
                    for eid in &task.target_edges {
                        if let Some(style) = styles.get_mut(eid) {
                            let pulsed = pulse_style(task.saved.get(eid).unwrap_or(style));
                            *style = pulsed.clone();
                            params.overrides.insert(eid.clone(), pulsed);
                        }
                    }
                    kept.push(task);
                }
            }
        }
        self.tasks = kept;
        if any_ants {
            // Shared phase: one step per frame no matter how many edges.
            self.phase = (self.phase + ANTS_PHASE_STEP) % ANTS_PHASE_PERIOD;
        }
        params.dash_offset = self.phase;
        params
    }

    /// Drops every task. Pulses restore their snapshot first, so no edge
    /// is ever left stuck in the pulsing style. Restores run newest-first:
    /// with overlapping pulses on one edge the oldest snapshot wins.
    pub fn cancel_all(&mut self, styles: &mut HashMap<EdgeId, EdgeStyle>) {
        for task in self.tasks.drain(..).rev() {
            if task.kind == AnimationKind::FlowPulse {
                restore(&task, styles);
            }
        }
        self.phase = 0.0;
    }

    /// Teardown: trips the token so in-flight loops stop, then restores.
    pub fn dispose(&mut self, styles: &mut HashMap<EdgeId, EdgeStyle>) {
        self.token.cancel();
        self.cancel_all(styles);
    }
}

fn restore(task: &AnimationTask, styles: &mut HashMap<EdgeId, EdgeStyle>) {
    for (eid, saved) in &task.saved {
        styles.insert(eid.clone(), saved.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::Relation;

    fn eid(s: &str) -> EdgeId {
        EdgeId(s.to_string())
    }

    fn baseline() -> HashMap<EdgeId, EdgeStyle> {
        HashMap::from([
            (eid("e1"), Relation::DependsOn.baseline_style()),
            (eid("e2"), Relation::Invokes.baseline_style()),
        ])
    }

    #[test]
    fn ants_phase_advances_and_wraps() {
        let mut sched = AnimationScheduler::default();
        let mut styles = baseline();
        sched.start_marching_ants(vec![eid("e1")]);

        let first = sched.advance_frame(&mut styles);
        assert_eq!(first.dash_offset, ANTS_PHASE_STEP);
        assert_eq!(first.ants_edges, vec![eid("e1")]);

        for _ in 0..(ANTS_PHASE_PERIOD as usize - 1) {
            sched.advance_frame(&mut styles);
        }
        // Full period elapsed: the offset wrapped back to zero.
        let wrapped = sched.advance_frame(&mut styles);
        assert_eq!(wrapped.dash_offset, ANTS_PHASE_STEP);
    }

    #[test]
    fn flow_pulse_overrides_then_restores_exactly() {
        let mut sched = AnimationScheduler::default();
        let mut styles = baseline();
        let before = styles.clone();

        sched.start_flow_pulse(vec![eid("e1")], &styles);
        let params = sched.advance_frame(&mut styles);
        assert!(params.overrides.contains_key(&eid("e1")));
        assert_ne!(styles[&eid("e1")], before[&eid("e1")]);
        // Untargeted edge untouched.
        assert_eq!(styles[&eid("e2")], before[&eid("e2")]);

        for _ in 0..PULSE_DURATION_FRAMES {
            sched.advance_frame(&mut styles);
        }
        assert!(!sched.is_active());
        assert_eq!(styles, before);
    }

    #[test]
    fn cancel_mid_flight_still_restores() {
        let mut sched = AnimationScheduler::default();
        let mut styles = baseline();
        let before = styles.clone();

        sched.start_flow_pulse(vec![eid("e1"), eid("e2")], &styles);
        sched.advance_frame(&mut styles);
        sched.advance_frame(&mut styles);
        sched.cancel_all(&mut styles);

        assert_eq!(styles, before);
        assert!(!sched.is_active());
    }

    #[test]
    fn cancelled_token_stops_future_ticks() {
        let mut sched = AnimationScheduler::default();
        let mut styles = baseline();
        sched.start_marching_ants(vec![eid("e1")]);
        sched.token().cancel();

        assert!(!sched.is_active());
        let params = sched.advance_frame(&mut styles);
        assert!(params.ants_edges.is_empty());
        assert_eq!(params.dash_offset, 0.0);
    }

    #[test]
    fn snapshot_is_taken_at_task_start() {
        let mut sched = AnimationScheduler::default();
        let mut styles = baseline();
        let original = styles[&eid("e1")].clone();

        sched.start_flow_pulse(vec![eid("e1")], &styles);
        sched.advance_frame(&mut styles);
        // Second pulse starts while e1 is already pulsing; its snapshot sees
        // the pulsed style, so restore order decides the final style.
        sched.start_flow_pulse(vec![eid("e1")], &styles);
        sched.advance_frame(&mut styles);
        sched.cancel_all(&mut styles);
        assert_eq!(styles[&eid("e1")], original);
    }

    #[test]
    fn idle_scheduler_reports_inactive() {
        let sched = AnimationScheduler::default();
        assert!(!sched.is_active());
    }
}
