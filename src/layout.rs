//! Arc diagram layout.
//!
//! Turns a sentence into a set of positioned, z-ordered drawables:
//! - one label per token text and one per token ID
//! - per dependency, a bracket (legs, corners, horizontal span) and a label
//!
//! ## Lanes
//!
//! Arcs are packed into horizontal lanes on each side of the token line:
//! secondary arcs above, primary arcs below. Lane 0 is the one nearest the
//! tokens. Arcs are taken in display order (shortest span first) and each
//! goes into the first lane whose cells `[left, right]` are all free. Lanes
//! scanned on the way out get a leg mark at the head and dependent columns,
//! so an arc routed further out stays visibly connected to its tokens. When
//! no lane is free, a new outermost lane is opened.
//!
//! Legs are part of their bracket: they paint over the labels of the lane they
//! cross, and clicking one selects the bracket.
//!
//! This is a greedy first-fit packing, not a minimum-lane solution. Its result
//! depends only on arc order and columns, never on label text. Span labels stay
//! inside their bracket; a stub takes only its own column, and its label is
//! drawn over whatever shares the lane.
//!
//! The canvas is rebuilt from scratch after every change to the sentence.

use tracing::debug;

use crate::model::{Dependency, Sentence, Token};
use crate::text::{display_width, fit_width};

/// Default number of blank cells between two tokens.
pub const DEFAULT_SPACING: usize = 3;

/// Z order of pass-through legs; a leg crossing a nearer lane is drawn
/// over that lane's labels.
pub const LEG_Z: u8 = 3;
/// Z order of labels; labels win hit-tests over brackets.
pub const LABEL_Z: u8 = 2;
/// Z order of brackets.
pub const BRACKET_Z: u8 = 1;

/// Side of the token line an arc is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

/// Horizontal end of a bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Left,
    Right,
}

/// Which endpoint of the arc a corner or leg belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Head,
    Dependent,
}

/// Abstract glyph; the UI maps it to a concrete character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphKind {
    Horizontal,
    /// Vertical leg at the head column, crossing a nearer lane
    HeadLeg,
    /// Vertical leg at the dependent column, crossing a nearer lane
    DependentLeg,
    Corner { side: Side, end: End, role: Role },
    /// Marker of a self-referential arc
    Stub,
}

impl GlyphKind {
    pub fn is_leg(self) -> bool {
        matches!(self, GlyphKind::HeadLeg | GlyphKind::DependentLeg)
    }
}

/// One glyph at canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub x: usize,
    pub y: usize,
    pub kind: GlyphKind,
}

/// A rectangle of canvas cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// The domain object a drawable stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Token at this index
    Token(usize),
    Dependency(Dependency),
}

/// What a label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    TokenText,
    TokenId,
    Relation(Side),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawableKind {
    Label { role: LabelRole, text: String },
    Bracket { side: Side, glyphs: Vec<Glyph> },
}

/// A positioned rendering primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawable {
    pub kind: DrawableKind,
    /// Cells that select this drawable; a bracket's legs select it too
    pub rect: CellRect,
    pub z: u8,
    pub target: Option<Target>,
}

impl Drawable {
    /// The dependency behind this drawable, if any.
    pub fn dependency(&self) -> Option<&Dependency> {
        match &self.target {
            Some(Target::Dependency(dep)) => Some(dep),
            _ => None,
        }
    }

    /// Z order of this drawable at a cell, or `None` if the cell does not
    /// select it.
    ///
    /// A bracket selects on its lane row and on its leg cells in nearer
    /// lanes; leg cells report [`LEG_Z`].
    pub fn z_at(&self, x: usize, y: usize) -> Option<u8> {
        if let DrawableKind::Bracket { glyphs, .. } = &self.kind {
            let on_leg = glyphs
                .iter()
                .any(|g| g.x == x && g.y == y && g.kind.is_leg());
            if on_leg {
                return Some(LEG_Z);
            }
        }
        self.rect.contains(x, y).then_some(self.z)
    }
}

/// Horizontal placement of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenColumn {
    /// First cell of the token text
    pub start: usize,
    /// Cells taken by the wider of text and ID
    pub width: usize,
    /// Offset of the ID label from `start`
    pub id_offset: usize,
    /// Column arcs attach to
    pub center: usize,
}

/// Places tokens left to right with `spacing` blank cells between them.
///
/// Each token is as wide as the wider of its text and its ID; the ID is
/// centered under the text.
pub fn token_columns(tokens: &[Token], spacing: usize) -> Vec<TokenColumn> {
    let mut x = 0;
    tokens
        .iter()
        .map(|token| {
            let id_width = display_width(&token.id);
            let width = display_width(&token.text).max(id_width).max(1);
            let column = TokenColumn {
                start: x,
                width,
                id_offset: (width - id_width) / 2,
                center: x + (width - 1) / 2,
            };
            x += width + spacing;
            column
        })
        .collect()
}

/// A relation label placed in an arc's lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLabel {
    pub x: usize,
    pub text: String,
}

/// One arc after lane assignment, in lane-relative coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedArc {
    pub dependency: Dependency,
    pub lane: usize,
    pub left: usize,
    pub right: usize,
    /// `(x, lane, kind)` triples
    pub glyphs: Vec<(usize, usize, GlyphKind)>,
    pub label: Option<PlacedLabel>,
}

/// Lane assignment for one side of the token line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanePlan {
    pub lanes: usize,
    pub arcs: Vec<PlacedArc>,
}

/// Occupancy of the lanes on one side, `width` cells each.
struct LaneGrid {
    width: usize,
    lanes: Vec<Vec<bool>>,
}

impl LaneGrid {
    fn new(width: usize) -> Self {
        Self {
            width,
            lanes: Vec::new(),
        }
    }

    fn is_free(&self, lane: usize, left: usize, right: usize) -> bool {
        self.lanes[lane][left..=right].iter().all(|taken| !taken)
    }

    fn open_lane(&mut self) -> usize {
        self.lanes.push(vec![false; self.width]);
        self.lanes.len() - 1
    }

    fn claim(&mut self, lane: usize, from: usize, to_exclusive: usize) {
        let to = to_exclusive.min(self.width);
        for cell in &mut self.lanes[lane][from.min(to)..to] {
            *cell = true;
        }
    }
}

/// Assigns lanes to arcs, first fit in the given order.
///
/// `centers[i]` is the column of token `i`; `width` is the canvas width.
/// Arcs whose endpoints are not valid token indices are skipped.
pub fn place_arcs(centers: &[usize], width: usize, deps: &[Dependency], side: Side) -> LanePlan {
    let mut grid = LaneGrid::new(width);
    let mut arcs = Vec::with_capacity(deps.len());

    for dep in deps {
        let (Some(&head), Some(&dependent)) = (centers.get(dep.head_index), centers.get(dep.dependent_index)) else {
            debug!(?dep, "arc endpoint outside the sentence, skipped");
            continue;
        };
        let left = head.min(dependent);
        let right = head.max(dependent);
        if right >= width {
            debug!(?dep, width, "arc outside the canvas, skipped");
            continue;
        }
        let mut glyphs = Vec::new();

        let mut assigned = None;
        for lane in 0..grid.lanes.len() {
            if grid.is_free(lane, left, right) {
                assigned = Some(lane);
                break;
            }
            let cells = &mut grid.lanes[lane];
            if head != dependent && !cells[head] {
                cells[head] = true;
                glyphs.push((head, lane, GlyphKind::HeadLeg));
            }
            cells[dependent] = true;
            glyphs.push((dependent, lane, GlyphKind::DependentLeg));
        }
        let lane = match assigned {
            Some(lane) => lane,
            None => grid.open_lane(),
        };

        let label = if head == dependent {
            glyphs.push((head, lane, GlyphKind::Stub));
            grid.claim(lane, head, head + 1);
            place_stub_label(&dep.name, head, width)
        } else {
            let (left_role, right_role) = if dep.head_index < dep.dependent_index {
                (Role::Head, Role::Dependent)
            } else {
                (Role::Dependent, Role::Head)
            };
            glyphs.push((
                left,
                lane,
                GlyphKind::Corner {
                    side,
                    end: End::Left,
                    role: left_role,
                },
            ));
            glyphs.extend((left + 1..right).map(|x| (x, lane, GlyphKind::Horizontal)));
            glyphs.push((
                right,
                lane,
                GlyphKind::Corner {
                    side,
                    end: End::Right,
                    role: right_role,
                },
            ));
            grid.claim(lane, left, right + 1);
            place_span_label(&dep.name, left, right)
        };

        arcs.push(PlacedArc {
            dependency: dep.clone(),
            lane,
            left,
            right,
            glyphs,
            label,
        });
    }

    LanePlan {
        lanes: grid.lanes.len(),
        arcs,
    }
}

/// Centers the label in the span; a label too wide starts one cell inside
/// the left corner and is cut at the right corner.
fn place_span_label(name: &str, left: usize, right: usize) -> Option<PlacedLabel> {
    let len = display_width(name) as isize;
    let offset = (((right - left) as isize - len) / 2).max(1) as usize;
    let x = left + offset;
    let text = fit_width(name, right.saturating_sub(x));
    if text.is_empty() {
        return None;
    }
    Some(PlacedLabel {
        x,
        text: text.to_string(),
    })
}

/// Centers the label on the stub column, kept inside the canvas.
fn place_stub_label(name: &str, col: usize, width: usize) -> Option<PlacedLabel> {
    let len = display_width(name);
    let x = if len >= width {
        0
    } else {
        col.saturating_sub(len / 2).min(width - len)
    };
    let text = fit_width(name, width - x);
    if text.is_empty() {
        return None;
    }
    Some(PlacedLabel {
        x,
        text: text.to_string(),
    })
}

/// Layout options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Blank cells between tokens
    pub spacing: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
        }
    }
}

/// The drawable set of one sentence.
///
/// Rows from top to bottom: the lanes above (outermost first), the token
/// text row, the token ID row, the lanes below (innermost first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub width: usize,
    pub height: usize,
    pub text_row: usize,
    pub id_row: usize,
    pub lanes_above: usize,
    pub lanes_below: usize,
    pub drawables: Vec<Drawable>,
}

impl Diagram {
    /// Lays out a sentence.
    pub fn build(sentence: &Sentence, options: LayoutOptions) -> Self {
        let tokens = sentence.tokens();
        let columns = token_columns(&tokens, options.spacing);
        let width = columns.last().map(|c| c.start + c.width).unwrap_or(0).max(1);
        let centers: Vec<usize> = columns.iter().map(|c| c.center).collect();

        let above = place_arcs(&centers, width, &sentence.secondary_dependencies(), Side::Above);
        let below = place_arcs(&centers, width, &sentence.primary_dependencies(), Side::Below);

        let text_row = above.lanes;
        let id_row = text_row + 1;
        let lanes_below = below.lanes;
        let mut drawables = Vec::new();

        push_arcs(&mut drawables, above, Side::Above, |lane| text_row - 1 - lane);
        push_arcs(&mut drawables, below, Side::Below, |lane| id_row + 1 + lane);

        for (index, (token, column)) in tokens.iter().zip(&columns).enumerate() {
            drawables.push(Drawable {
                kind: DrawableKind::Label {
                    role: LabelRole::TokenText,
                    text: token.text.clone(),
                },
                rect: CellRect::new(column.start, text_row, display_width(&token.text).max(1), 1),
                z: LABEL_Z,
                target: Some(Target::Token(index)),
            });
            drawables.push(Drawable {
                kind: DrawableKind::Label {
                    role: LabelRole::TokenId,
                    text: token.id.clone(),
                },
                rect: CellRect::new(column.start + column.id_offset, id_row, display_width(&token.id).max(1), 1),
                z: LABEL_Z,
                target: Some(Target::Token(index)),
            });
        }

        let diagram = Self {
            width,
            height: id_row + 1 + lanes_below,
            text_row,
            id_row,
            lanes_above: text_row,
            lanes_below,
            drawables,
        };
        debug!(
            tokens = tokens.len(),
            lanes_above = diagram.lanes_above,
            lanes_below = diagram.lanes_below,
            drawables = diagram.drawables.len(),
            "diagram rebuilt"
        );
        diagram
    }

    /// Gets a drawable by index.
    pub fn get(&self, index: usize) -> Option<&Drawable> {
        self.drawables.get(index)
    }
}

/// Converts lane-relative arcs into drawables; `row_of` maps a lane to a row.
fn push_arcs(drawables: &mut Vec<Drawable>, plan: LanePlan, side: Side, row_of: impl Fn(usize) -> usize) {
    for arc in plan.arcs {
        let y = row_of(arc.lane);
        let glyphs = arc
            .glyphs
            .iter()
            .map(|&(x, lane, kind)| Glyph { x, y: row_of(lane), kind })
            .collect();
        drawables.push(Drawable {
            kind: DrawableKind::Bracket { side, glyphs },
            rect: CellRect::new(arc.left, y, arc.right - arc.left + 1, 1),
            z: BRACKET_Z,
            target: Some(Target::Dependency(arc.dependency.clone())),
        });
        if let Some(label) = arc.label {
            drawables.push(Drawable {
                rect: CellRect::new(label.x, y, display_width(&label.text), 1),
                kind: DrawableKind::Label {
                    role: LabelRole::Relation(side),
                    text: label.text,
                },
                z: LABEL_Z,
                target: Some(Target::Dependency(arc.dependency)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{parse_str, FileFormat};
    use crate::model::ArcId;

    fn dep(id: u64, name: &str, head: usize, dependent: usize) -> Dependency {
        Dependency::new(ArcId::Annotation(id), name, head, dependent)
    }

    fn tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new((i + 1).to_string(), *w, *w))
            .collect()
    }

    fn overlaps(a: &PlacedArc, b: &PlacedArc) -> bool {
        a.left <= b.right && b.left <= a.right
    }

    #[test]
    fn test_token_columns() {
        let cols = token_columns(&tokens(&["The", "cat", "sat"]), 3);
        let starts: Vec<_> = cols.iter().map(|c| c.start).collect();
        let centers: Vec<_> = cols.iter().map(|c| c.center).collect();
        assert_eq!(starts, vec![0, 6, 12]);
        assert_eq!(centers, vec![1, 7, 13]);
        assert_eq!(cols[0].id_offset, 1);
    }

    #[test]
    fn test_id_wider_than_text() {
        let toks = vec![Token::new("10", "a", "a"), Token::new("11", "bcd", "bcd")];
        let cols = token_columns(&toks, 1);
        assert_eq!(cols[0].width, 2);
        assert_eq!(cols[0].center, 0);
        assert_eq!(cols[1].start, 3);
        assert_eq!(cols[1].id_offset, 0);
    }

    #[test]
    fn test_single_arc_head_right_of_dependent() {
        let cols = token_columns(&tokens(&["The", "cat", "sat"]), 3);
        let centers: Vec<_> = cols.iter().map(|c| c.center).collect();
        let plan = place_arcs(&centers, 15, &[dep(0, "nsubj", 2, 1)], Side::Below);

        assert_eq!(plan.lanes, 1);
        let arc = &plan.arcs[0];
        assert_eq!((arc.lane, arc.left, arc.right), (0, 7, 13));
        assert!(arc.glyphs.contains(&(
            7,
            0,
            GlyphKind::Corner {
                side: Side::Below,
                end: End::Left,
                role: Role::Dependent
            }
        )));
        assert!(arc.glyphs.contains(&(
            13,
            0,
            GlyphKind::Corner {
                side: Side::Below,
                end: End::Right,
                role: Role::Head
            }
        )));
        assert_eq!(
            arc.label,
            Some(PlacedLabel {
                x: 8,
                text: "nsubj".to_string()
            })
        );
    }

    #[test]
    fn test_longer_arc_goes_to_outer_lane() {
        let centers = vec![1, 7, 13];
        let plan = place_arcs(&centers, 15, &[dep(0, "a", 0, 1), dep(1, "b", 0, 2)], Side::Below);
        assert_eq!(plan.lanes, 2);
        assert_eq!(plan.arcs[0].lane, 0);
        assert_eq!(plan.arcs[1].lane, 1);
        assert!(plan.arcs[1].glyphs.contains(&(13, 0, GlyphKind::DependentLeg)));
    }

    #[test]
    fn test_head_leg_only_on_free_cells() {
        // the head column of the outer arc is already taken by the inner arc's corner
        let centers = vec![1, 7, 13];
        let plan = place_arcs(&centers, 15, &[dep(0, "a", 0, 1), dep(1, "b", 0, 2)], Side::Below);
        let legs: Vec<_> = plan.arcs[1]
            .glyphs
            .iter()
            .filter(|(_, _, kind)| matches!(kind, GlyphKind::HeadLeg | GlyphKind::DependentLeg))
            .collect();
        assert_eq!(legs, vec![&(13, 0, GlyphKind::DependentLeg)]);
    }

    #[test]
    fn test_disjoint_arcs_share_a_lane() {
        let centers = vec![1, 7, 13, 19];
        let plan = place_arcs(&centers, 21, &[dep(0, "a", 0, 1), dep(1, "b", 3, 2)], Side::Above);
        assert_eq!(plan.lanes, 1);
        assert!(plan.arcs.iter().all(|a| a.lane == 0));
    }

    #[test]
    fn test_no_overlap_within_a_lane() {
        let centers: Vec<usize> = (0..8).map(|i| i * 4 + 1).collect();
        let mut deps = Vec::new();
        let mut id = 0;
        for head in 0..8 {
            for dependent in (0..8).step_by(3) {
                deps.push(dep(id, "rel", head, dependent));
                id += 1;
            }
        }
        crate::model::sort_for_display(&mut deps);
        let plan = place_arcs(&centers, 32, &deps, Side::Below);

        for (i, a) in plan.arcs.iter().enumerate() {
            for b in &plan.arcs[i + 1..] {
                if a.lane == b.lane && a.left != a.right && b.left != b.right {
                    assert!(!overlaps(a, b), "{:?} and {:?} share lane {}", a.dependency, b.dependency, a.lane);
                }
            }
        }
    }

    #[test]
    fn test_label_text_does_not_change_lanes() {
        let centers = vec![1, 7, 13, 19];
        let short = [dep(0, "a", 0, 1), dep(1, "b", 1, 3), dep(2, "c", 0, 2)];
        let mut long = short.clone();
        for d in &mut long {
            d.name = format!("{}-very-long-relation", d.name);
        }
        let lanes = |deps: &[Dependency]| -> Vec<usize> {
            place_arcs(&centers, 21, deps, Side::Below).arcs.iter().map(|a| a.lane).collect()
        };
        assert_eq!(lanes(&short), lanes(&long));
    }

    #[test]
    fn test_stub_label_text_does_not_change_lanes() {
        let centers = vec![1, 7, 13];
        let lanes = |name: &str| -> Vec<usize> {
            let deps = [dep(0, name, 2, 2), dep(1, "a", 0, 1)];
            place_arcs(&centers, 15, &deps, Side::Below).arcs.iter().map(|a| a.lane).collect()
        };
        assert_eq!(lanes("x"), vec![0, 0]);
        assert_eq!(lanes("longlabel"), vec![0, 0]);

        // the long label still overlays the neighbouring bracket
        let plan = place_arcs(&centers, 15, &[dep(0, "longlabel", 2, 2)], Side::Below);
        assert_eq!(plan.arcs[0].label.as_ref().unwrap().x, 6);
    }

    #[test]
    fn test_leg_cells_sit_above_labels() {
        let leg = Drawable {
            kind: DrawableKind::Bracket {
                side: Side::Below,
                glyphs: vec![
                    Glyph {
                        x: 7,
                        y: 3,
                        kind: GlyphKind::DependentLeg,
                    },
                    Glyph {
                        x: 7,
                        y: 4,
                        kind: GlyphKind::Corner {
                            side: Side::Below,
                            end: End::Left,
                            role: Role::Dependent,
                        },
                    },
                ],
            },
            rect: CellRect::new(7, 4, 13, 1),
            z: BRACKET_Z,
            target: None,
        };
        assert_eq!(leg.z_at(7, 3), Some(LEG_Z));
        assert_eq!(leg.z_at(7, 4), Some(BRACKET_Z));
        assert_eq!(leg.z_at(12, 4), Some(BRACKET_Z));
        assert_eq!(leg.z_at(8, 3), None);
        assert!(LEG_Z > LABEL_Z);
    }

    #[test]
    fn test_wide_label_left_aligned_and_cut() {
        let plan = place_arcs(&[1, 7], 9, &[dep(0, "dependency", 0, 1)], Side::Below);
        assert_eq!(
            plan.arcs[0].label,
            Some(PlacedLabel {
                x: 2,
                text: "depen".to_string()
            })
        );
    }

    #[test]
    fn test_self_referential_stub() {
        let plan = place_arcs(&[1, 7], 9, &[dep(0, "root", 1, 1)], Side::Below);
        let arc = &plan.arcs[0];
        assert_eq!(arc.glyphs, vec![(7, 0, GlyphKind::Stub)]);
        assert_eq!(
            arc.label,
            Some(PlacedLabel {
                x: 5,
                text: "root".to_string()
            })
        );

        // clipped at the canvas edges
        let plan = place_arcs(&[1, 7], 9, &[dep(0, "root", 0, 0)], Side::Below);
        assert_eq!(plan.arcs[0].label.as_ref().unwrap().x, 0);
        let plan = place_arcs(&[1], 3, &[dep(0, "root", 0, 0)], Side::Below);
        assert_eq!(plan.arcs[0].label.as_ref().unwrap().text, "roo");
    }

    #[test]
    fn test_diagram_rows_and_drawables() {
        let content = "\
1\tThe\tthe\t_\t_\t_\t2\tdet\t_\t_
2\tcat\tcat\t_\t_\t_\t3\tnsubj\t_\t_
3\tsat\tsit\t_\t_\t_\t0\troot\t_\t_
p2,3
";
        let doc = parse_str(content, FileFormat::Procon).unwrap();
        let diagram = Diagram::build(&doc.sentences[0], LayoutOptions::default());

        assert_eq!(diagram.width, 15);
        assert_eq!(diagram.lanes_above, 1);
        assert_eq!(diagram.text_row, 1);
        assert_eq!(diagram.id_row, 2);
        // root stub and det share the first lane; nsubj runs into det's corner
        assert_eq!(diagram.lanes_below, 2);
        assert_eq!(diagram.height, 5);

        let brackets = diagram
            .drawables
            .iter()
            .filter(|d| matches!(d.kind, DrawableKind::Bracket { .. }))
            .count();
        assert_eq!(brackets, 4);

        let above = diagram
            .drawables
            .iter()
            .find(|d| matches!(d.kind, DrawableKind::Bracket { side: Side::Above, .. }))
            .unwrap();
        assert_eq!(above.rect, CellRect::new(7, 0, 7, 1));
        assert_eq!(above.z, BRACKET_Z);

        let cat = diagram
            .drawables
            .iter()
            .find(|d| d.target == Some(Target::Token(1)) && d.rect.y == diagram.text_row)
            .unwrap();
        assert_eq!(cat.rect, CellRect::new(6, 1, 3, 1));
        assert_eq!(cat.z, LABEL_Z);
    }

    #[test]
    fn test_empty_sentence_layout() {
        let sentence = Sentence::Tabular(crate::formats::conll::ConllSentence::default());
        let diagram = Diagram::build(&sentence, LayoutOptions::default());
        assert_eq!(diagram.width, 1);
        assert_eq!(diagram.height, 2);
        assert!(diagram.drawables.is_empty());
    }
}
