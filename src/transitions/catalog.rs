use super::{CubicBezier, Pose, TimingProfile, TransitionVariant};

// Easing presets shared by a few variants.
const EASE_SNAPPY: CubicBezier = CubicBezier { x1: 0.4, y1: 0.0, x2: 0.2, y2: 1.0 };
const EASE_SMOOTH: CubicBezier = CubicBezier { x1: 0.25, y1: 0.1, x2: 0.25, y2: 1.0 };
const EASE_DRAMATIC: CubicBezier = CubicBezier { x1: 0.645, y1: 0.045, x2: 0.355, y2: 1.0 };
const EASE_OVERSHOOT: CubicBezier = CubicBezier { x1: 0.34, y1: 1.56, x2: 0.64, y2: 1.0 };
const EASE_DRIFT: CubicBezier = CubicBezier { x1: 0.22, y1: 0.61, x2: 0.36, y2: 1.0 };

pub fn timing(variant: TransitionVariant) -> TimingProfile {
    match variant {
        TransitionVariant::Slide => TimingProfile { duration_ms: 800, easing: EASE_SNAPPY },
        TransitionVariant::Zoom => TimingProfile { duration_ms: 900, easing: EASE_OVERSHOOT },
        TransitionVariant::Fade => TimingProfile { duration_ms: 1000, easing: EASE_SMOOTH },
        TransitionVariant::Flip => TimingProfile { duration_ms: 1100, easing: EASE_DRAMATIC },
        TransitionVariant::Cube => TimingProfile { duration_ms: 1200, easing: EASE_DRAMATIC },
        TransitionVariant::Wave => TimingProfile { duration_ms: 1400, easing: EASE_DRIFT },
        TransitionVariant::Dissolve => TimingProfile { duration_ms: 1600, easing: EASE_SMOOTH },
        TransitionVariant::Spiral => TimingProfile { duration_ms: 1800, easing: EASE_DRAMATIC },
        TransitionVariant::Curtain => TimingProfile { duration_ms: 2000, easing: EASE_DRIFT },
        TransitionVariant::Origami => TimingProfile { duration_ms: 2400, easing: EASE_OVERSHOOT },
    }
}

/// Pose the incoming slide starts from. `sign` is +1 going forward, -1 going
/// backward, so forward entry from the right becomes backward entry from the
/// left.
pub fn enter_pose(variant: TransitionVariant, sign: f64) -> Pose {
    let base = Pose::identity();
    match variant {
        TransitionVariant::Slide => Pose {
            translate_x: 100.0 * sign,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Fade => Pose {
            scale: 0.96,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Zoom => Pose {
            scale: if sign >= 0.0 { 0.4 } else { 1.8 },
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Flip => Pose {
            rotate: -90.0 * sign,
            scale: 0.8,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Cube => Pose {
            translate_x: 100.0 * sign,
            rotate: 90.0 * sign,
            scale: 0.9,
            opacity: 0.4,
            ..base
        },
        TransitionVariant::Spiral => Pose {
            rotate: -720.0 * sign,
            scale: 0.1,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Wave => Pose {
            translate_x: 100.0 * sign,
            translate_y: 30.0,
            skew: -12.0 * sign,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Dissolve => Pose {
            blur: 18.0,
            scale: 1.05,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Curtain => Pose {
            translate_y: -100.0 * sign,
            opacity: 0.6,
            ..base
        },
        TransitionVariant::Origami => Pose {
            translate_x: 60.0 * sign,
            rotate: 18.0 * sign,
            skew: -24.0 * sign,
            scale: 0.5,
            opacity: 0.0,
            ..base
        },
    }
}

/// Pose the outgoing slide leaves toward; the mirror image of the entry so
/// the deck reads as one continuous surface.
pub fn exit_pose(variant: TransitionVariant, sign: f64) -> Pose {
    let base = Pose::identity();
    match variant {
        TransitionVariant::Slide => Pose {
            translate_x: -100.0 * sign,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Fade => Pose {
            scale: 1.04,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Zoom => Pose {
            scale: if sign >= 0.0 { 1.8 } else { 0.4 },
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Flip => Pose {
            rotate: 90.0 * sign,
            scale: 0.8,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Cube => Pose {
            translate_x: -100.0 * sign,
            rotate: -90.0 * sign,
            scale: 0.9,
            opacity: 0.4,
            ..base
        },
        TransitionVariant::Spiral => Pose {
            rotate: 720.0 * sign,
            scale: 0.1,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Wave => Pose {
            translate_x: -100.0 * sign,
            translate_y: -30.0,
            skew: 12.0 * sign,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Dissolve => Pose {
            blur: 18.0,
            scale: 0.95,
            opacity: 0.0,
            ..base
        },
        TransitionVariant::Curtain => Pose {
            translate_y: 100.0 * sign,
            opacity: 0.6,
            ..base
        },
        TransitionVariant::Origami => Pose {
            translate_x: -60.0 * sign,
            rotate: -18.0 * sign,
            skew: 24.0 * sign,
            scale: 0.5,
            opacity: 0.0,
            ..base
        },
    }
}
