//! Wheel geometry and spin bookkeeping.
//!
//! The wheel is divided into `N` equal segments, segment 0 starting at 0°
//! (the 3 o'clock axis, clockwise) in the wheel's own frame. The pointer
//! sits at the top, which is 270° in that frame. A spin adds at least six
//! full turns plus a random offset to a rotation accumulator that only ever
//! grows until a full clear.
//!
//! A spin is split in two steps so the settle delay can happen outside any
//! lock: [`WheelSelector::begin`] draws the rotation and marks the spin as
//! in flight, [`WheelSelector::finish`] maps the final angle to a segment.
//! Only one spin may be in flight at a time.

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::custom::CustomEntries;
use crate::registry::SelectionRegistry;
use crate::results::SpinOutcome;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Degrees in one turn.
pub const FULL_TURN: f64 = 360.0;

/// Whole turns added by every spin before the random offset.
pub const MIN_TURNS: u32 = 6;

/// Pointer position in the wheel's drawing frame.
pub const POINTER_ANGLE: f64 = 270.0;

/// Angular width of one segment, in degrees.
pub fn segment_angle(segment_count: usize) -> f64 {
    FULL_TURN / segment_count as f64
}

/// Reduce an accumulated rotation to `[0, 360)`.
pub fn normalize_degrees(rotation: f64) -> f64 {
    rotation.rem_euclid(FULL_TURN)
}

/// Segment under the pointer after the wheel has turned `rotation` degrees.
///
/// Returns `None` for an empty wheel.
pub fn winning_index(rotation: f64, segment_count: usize) -> Option<usize> {
    if segment_count == 0 {
        return None;
    }
    let theta = normalize_degrees(rotation);
    let alpha = (POINTER_ANGLE - theta).rem_euclid(FULL_TURN);
    let index = (alpha / segment_angle(segment_count)).floor() as usize;
    Some(index.min(segment_count - 1))
}

/// Draw the rotation added by one spin: `MIN_TURNS` full turns plus a
/// uniform offset in `[0, 360)`.
pub fn draw_extra_rotation<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(MIN_TURNS) * FULL_TURN + rng.random_range(0.0..FULL_TURN)
}

/// Registry names followed by non-blank custom entries.
pub fn wheel_contents(registry: &SelectionRegistry, custom: &CustomEntries) -> Vec<String> {
    registry
        .names()
        .iter()
        .cloned()
        .chain(custom.labels().map(str::to_string))
        .collect()
}

// ---------------------------------------------------------------------------
// Spin state
// ---------------------------------------------------------------------------

/// Errors reported by a spin request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpinError {
    #[error("The wheel is empty; add shows or custom entries first")]
    EmptyWheel,

    #[error("A spin is already in progress")]
    ConcurrentSpin,

    #[error("Spin was cancelled before it settled")]
    Cancelled,
}

/// A spin that has been started but not yet settled.
#[derive(Debug, Clone)]
pub struct PendingSpin {
    id: u64,
    contents: Vec<String>,
    extra_rotation: f64,
    final_rotation: f64,
    cancel: CancellationToken,
}

impl PendingSpin {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wheel contents captured when the spin was requested.
    pub fn contents(&self) -> &[String] {
        &self.contents
    }

    pub fn extra_rotation(&self) -> f64 {
        self.extra_rotation
    }

    /// Accumulated rotation the wheel settles at.
    pub fn final_rotation(&self) -> f64 {
        self.final_rotation
    }

    /// Token cancelled when this spin is abandoned.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    cancel: CancellationToken,
}

/// Rotation accumulator plus the single in-flight guard.
#[derive(Debug, Default)]
pub struct WheelSelector {
    rotation: f64,
    next_id: u64,
    in_flight: Option<InFlight>,
}

impl WheelSelector {
    /// Accumulated rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// `true` while a spin is in flight. A spin whose token was cancelled
    /// (its driver went away) no longer counts.
    pub fn is_spinning(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|in_flight| !in_flight.cancel.is_cancelled())
    }

    /// Start a spin over `contents`.
    ///
    /// Fails without touching any state when the wheel is empty or another
    /// spin is still in flight. An abandoned spin (token cancelled but never
    /// finished) is dropped first.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        contents: Vec<String>,
        rng: &mut R,
    ) -> Result<PendingSpin, SpinError> {
        if let Some(stale) = self
            .in_flight
            .take_if(|in_flight| in_flight.cancel.is_cancelled())
        {
            tracing::debug!(spin_id = stale.id, "Dropping abandoned spin");
        }
        if self.in_flight.is_some() {
            return Err(SpinError::ConcurrentSpin);
        }
        if contents.is_empty() {
            return Err(SpinError::EmptyWheel);
        }

        let extra_rotation = draw_extra_rotation(rng);
        self.rotation += extra_rotation;
        self.next_id += 1;

        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            id: self.next_id,
            cancel: cancel.clone(),
        });

        tracing::debug!(
            spin_id = self.next_id,
            segments = contents.len(),
            extra_rotation,
            rotation = self.rotation,
            "Spin started",
        );

        Ok(PendingSpin {
            id: self.next_id,
            contents,
            extra_rotation,
            final_rotation: self.rotation,
            cancel,
        })
    }

    /// Settle `pending` and pick the winner.
    ///
    /// Fails with [`SpinError::Cancelled`] if the spin is no longer the one
    /// in flight (it was cancelled or the wheel was cleared meanwhile).
    pub fn finish(&mut self, pending: &PendingSpin) -> Result<SpinOutcome, SpinError> {
        match &self.in_flight {
            Some(current) if current.id == pending.id && !pending.cancel.is_cancelled() => {}
            _ => return Err(SpinError::Cancelled),
        }
        self.in_flight = None;

        let index = winning_index(pending.final_rotation, pending.contents.len())
            .ok_or(SpinError::EmptyWheel)?;
        let label = pending.contents[index].clone();

        tracing::debug!(spin_id = pending.id, index, label = %label, "Spin settled");

        Ok(SpinOutcome {
            label,
            index,
            final_rotation: pending.final_rotation,
            spun_at: chrono::Utc::now(),
        })
    }

    /// Abandon the in-flight spin, if any. The rotation it added stays.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel any in-flight spin and return the accumulator to 0.
    pub fn reset(&mut self) {
        self.cancel();
        self.rotation = 0.0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
