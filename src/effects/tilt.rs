use crate::effects::Point;

pub const MAX_TILT_DEG: f32 = 5.0;
pub const HOVER_SCALE: f32 = 1.02;
pub const PERSPECTIVE_PX: f32 = 1000.0;

/// Card bounds in client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CardRect {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x < self.left + self.width
            && p.y >= self.top
            && p.y < self.top + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x: f32,
    pub rotate_y: f32,
    pub scale: f32,
}

impl Tilt {
    pub const NEUTRAL: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
        scale: 1.0,
    };

    /// Tilt toward a pointer at client position `at` over `rect`.
    ///
    /// The top edge tips toward the viewer when the pointer is above centre (negative
    /// vertical offset gives positive `rotate_x`); both axes are capped at [`MAX_TILT_DEG`].
    pub fn for_pointer(rect: CardRect, at: Point) -> Tilt {
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return Tilt::NEUTRAL;
        }
        let cx = rect.width / 2.0;
        let cy = rect.height / 2.0;
        let x = at.x - rect.left;
        let y = at.y - rect.top;

        let rotate_x = ((y - cy) / cy * -MAX_TILT_DEG).clamp(-MAX_TILT_DEG, MAX_TILT_DEG);
        let rotate_y = ((x - cx) / cx * MAX_TILT_DEG).clamp(-MAX_TILT_DEG, MAX_TILT_DEG);
        Tilt {
            rotate_x,
            rotate_y,
            scale: HOVER_SCALE,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Tilt::NEUTRAL
    }

    pub fn to_css(&self) -> String {
        format!(
            "perspective({PERSPECTIVE_PX}px) rotateX({}deg) rotateY({}deg) scale3d({s}, {s}, {s})",
            self.rotate_x,
            self.rotate_y,
            s = self.scale,
        )
    }
}

impl Default for Tilt {
    fn default() -> Self {
        Tilt::NEUTRAL
    }
}
