use crate::layout::{End, GlyphKind, Role, Side};

/// Corner characters for one side of the token line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corners {
    pub head_left: char,
    pub head_right: char,
    pub dependent_left: char,
    pub dependent_right: char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    pub horizontal: char,
    pub head_leg: char,
    pub dependent_leg: char,
    pub stub: char,
    pub below: Corners,
    pub above: Corners,
}

impl Glyphs {
    /// Concrete character for an abstract arc glyph.
    pub fn char_for(&self, kind: GlyphKind) -> char {
        match kind {
            GlyphKind::Horizontal => self.horizontal,
            GlyphKind::HeadLeg => self.head_leg,
            GlyphKind::DependentLeg => self.dependent_leg,
            GlyphKind::Stub => self.stub,
            GlyphKind::Corner { side, end, role } => {
                let corners = match side {
                    Side::Above => &self.above,
                    Side::Below => &self.below,
                };
                match (end, role) {
                    (End::Left, Role::Head) => corners.head_left,
                    (End::Right, Role::Head) => corners.head_right,
                    (End::Left, Role::Dependent) => corners.dependent_left,
                    (End::Right, Role::Dependent) => corners.dependent_right,
                }
            }
        }
    }
}

pub fn select(fancy_requested: bool) -> Glyphs {
    if fancy_requested {
        fancy()
    } else {
        ascii()
    }
}

fn ascii() -> Glyphs {
    Glyphs {
        horizontal: '-',
        head_leg: '|',
        dependent_leg: '!',
        stub: '!',
        below: Corners {
            head_left: '+',
            head_right: '+',
            dependent_left: '^',
            dependent_right: '^',
        },
        above: Corners {
            head_left: '+',
            head_right: '+',
            dependent_left: 'v',
            dependent_right: 'v',
        },
    }
}

// Thin lines mark the head end of an arc, double lines the dependent end.
fn fancy() -> Glyphs {
    Glyphs {
        horizontal: '─',
        head_leg: '│',
        dependent_leg: '║',
        stub: '║',
        below: Corners {
            head_left: '└',
            head_right: '┘',
            dependent_left: '╙',
            dependent_right: '╜',
        },
        above: Corners {
            head_left: '┌',
            head_right: '┐',
            dependent_left: '╓',
            dependent_right: '╖',
        },
    }
}
