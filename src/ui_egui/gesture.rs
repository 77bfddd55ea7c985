// Pointer gestures on the day timeline
//
// Long-press to start editing, then drag the draft body to move it or its
// bottom edge to resize it. Times snap to quarter hours.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

/// Snap granularity for dragged times, in minutes.
pub const SNAP_MINUTES: i64 = 15;
/// Height of the bottom-edge hit area that resizes instead of moving.
pub const RESIZE_HANDLE_HEIGHT: f32 = 8.0;
/// A resized event never gets shorter than one snap step.
pub const MIN_DURATION_MINUTES: i64 = SNAP_MINUTES;

/// What an active drag on the draft changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    /// Start and end shift together.
    Move,
    /// Only the end moves.
    ResizeEnd,
}

impl DragMode {
    /// Pick the mode from where the pointer grabbed the draft.
    pub fn for_grab(pointer_y: f32, rect_bottom: f32) -> Self {
        if rect_bottom - pointer_y <= RESIZE_HANDLE_HEIGHT {
            DragMode::ResizeEnd
        } else {
            DragMode::Move
        }
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self {
            DragMode::Move => egui::CursorIcon::Grabbing,
            DragMode::ResizeEnd => egui::CursorIcon::ResizeVertical,
        }
    }
}

/// Draft times captured when a drag starts.
#[derive(Clone, Debug)]
pub struct DragContext {
    pub mode: DragMode,
    pub original_start: DateTime<Utc>,
    pub original_end: DateTime<Utc>,
}

impl DragContext {
    pub fn new(mode: DragMode, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            mode,
            original_start: start,
            original_end: end,
        }
    }

    /// New `(start, end)` after the pointer travelled `delta_y` points.
    pub fn apply(&self, delta_y: f32, hour_height: f32) -> (DateTime<Utc>, DateTime<Utc>) {
        let delta = Duration::minutes(snap_minutes(points_to_minutes(delta_y, hour_height)));
        match self.mode {
            DragMode::Move => (self.original_start + delta, self.original_end + delta),
            DragMode::ResizeEnd => {
                let shortest = self.original_start + Duration::minutes(MIN_DURATION_MINUTES);
                let end = (self.original_end + delta).max(shortest);
                (self.original_start, end)
            }
        }
    }
}

pub fn points_to_minutes(points: f32, hour_height: f32) -> f32 {
    points / hour_height * 60.0
}

pub fn minutes_to_points(minutes: f32, hour_height: f32) -> f32 {
    minutes / 60.0 * hour_height
}

/// Round to the nearest snap step.
pub fn snap_minutes(minutes: f32) -> i64 {
    let step = SNAP_MINUTES as f32;
    ((minutes / step).round() * step) as i64
}

/// Tracks one press on an event until it becomes a long press or is released.
#[derive(Debug, Default)]
pub struct PressTracker {
    target: Option<i64>,
    fired: bool,
}

impl PressTracker {
    /// Feed the current press. Returns `true` exactly once per press, when
    /// `held` first reaches `threshold`.
    pub fn update(&mut self, event_id: i64, held: StdDuration, threshold: StdDuration) -> bool {
        if self.target != Some(event_id) {
            self.target = Some(event_id);
            self.fired = false;
        }

        if !self.fired && held >= threshold {
            self.fired = true;
            return true;
        }
        false
    }

    /// The current press already turned into a long press.
    pub fn fired(&self) -> bool {
        self.fired
    }

    pub fn release(&mut self) {
        self.target = None;
        self.fired = false;
    }
}

/// Side-by-side placement of overlapping timed events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSlot {
    pub column: usize,
    pub columns: usize,
}

/// Assign each interval a column so overlapping ones sit next to each other.
///
/// Intervals that touch only at an endpoint do not overlap. Every interval
/// in a cluster of transitively overlapping events gets the same column count.
pub fn layout_columns(intervals: &[(DateTime<Utc>, DateTime<Utc>)]) -> Vec<ColumnSlot> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| (intervals[i].0, intervals[i].1));

    let mut slots = vec![ColumnSlot { column: 0, columns: 1 }; intervals.len()];
    let mut cluster: Vec<usize> = Vec::new();
    let mut column_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut cluster_end: Option<DateTime<Utc>> = None;

    for index in order {
        let (start, end) = intervals[index];
        let end = end.max(start);

        if cluster_end.is_some_and(|cluster_end| start >= cluster_end) {
            close_cluster(&mut slots, &cluster, column_ends.len());
            cluster.clear();
            column_ends.clear();
            cluster_end = None;
        }

        let column = match column_ends.iter().position(|&column_end| column_end <= start) {
            Some(column) => {
                column_ends[column] = end;
                column
            }
            None => {
                column_ends.push(end);
                column_ends.len() - 1
            }
        };

        slots[index].column = column;
        cluster.push(index);
        cluster_end = Some(cluster_end.map_or(end, |current| current.max(end)));
    }

    close_cluster(&mut slots, &cluster, column_ends.len());
    slots
}

fn close_cluster(slots: &mut [ColumnSlot], cluster: &[usize], columns: usize) {
    for &index in cluster {
        slots[index].columns = columns.max(1);
    }
}
