//! Generate-frame nesting and sibling ordering.
//!
//! Frames claim the elements lying inside them. Nesting is resolved level by
//! level: an element belongs to the innermost frame that claims it.
//! Each level is then ordered by priority and the tree is flattened into a
//! [`SequenceItem`] list with explicit generate begin/end markers.
//!
//! Removing every enclosed element from the top level would silently drop an
//! element claimed by two overlapping sibling frames, since neither frame
//! owns it. Such an element is instead kept at the parent level and reported
//! with [`AMBIGUOUS_ENCLOSURE`] (W303).

use log::debug;
use schem_common::Rect;
use schem_diagnostics::{Category, Diagnostic, DiagnosticCode};
use schem_model::{ElementId, ElementKind};
use schem_source::Span;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Two siblings share a priority; their level keeps its original order.
pub const DUPLICATE_PRIORITY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
/// A generate frame encloses no element.
pub const EMPTY_GENERATE_BODY: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);
/// Overlapping sibling frames claim the same element.
pub const AMBIGUOUS_ENCLOSURE: DiagnosticCode = DiagnosticCode::new(Category::Warning, 303);

/// The sorter's view of one schematic element.
#[derive(Clone, Debug, PartialEq)]
pub struct SortItem {
    /// The element.
    pub id: ElementId,
    /// The element kind; only generate frames enclose other elements.
    pub kind: ElementKind,
    /// Sibling priority, if annotated.
    pub priority: Option<u32>,
    /// Bounding rectangle.
    pub rect: Rect,
}

/// Answers which elements lie inside a rectangle.
pub trait EnclosureQuery {
    /// Returns the elements enclosed by `rect`, never including `exclude`.
    fn enclosed(&self, rect: &Rect, exclude: ElementId) -> Vec<ElementId>;
}

/// Enclosure by bounding-rectangle containment.
pub struct GeometricEnclosure<'a> {
    items: &'a [SortItem],
}

impl<'a> GeometricEnclosure<'a> {
    /// Creates a query over the given elements.
    pub fn new(items: &'a [SortItem]) -> Self {
        Self { items }
    }
}

impl EnclosureQuery for GeometricEnclosure<'_> {
    fn enclosed(&self, rect: &Rect, exclude: ElementId) -> Vec<ElementId> {
        self.items
            .iter()
            // A frame drawn exactly on top of another does not nest inside it.
            .filter(|item| item.id != exclude && item.rect != *rect)
            .filter(|item| rect.contains_rect(&item.rect))
            .map(|item| item.id)
            .collect()
    }
}

/// One step of the flattened element tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceItem {
    /// Emit the element.
    Element(ElementId),
    /// Open the body of the preceding generate frame with these children.
    BeginGenerate(Vec<ElementId>),
    /// Close the body of the given generate frame.
    EndGenerate(ElementId),
}

/// The flattened element order plus the advisories found while sorting.
#[derive(Clone, Debug, Default)]
pub struct SortedSequence {
    /// Elements in emission order.
    pub items: Vec<SequenceItem>,
    /// Duplicate-priority, empty-frame and ambiguity warnings.
    pub diagnostics: Vec<Diagnostic>,
}

/// Sorts `items` (given in original order) into emission order.
pub fn sort(items: &[SortItem], query: &dyn EnclosureQuery) -> SortedSequence {
    let index_of: HashMap<ElementId, usize> =
        items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
    let raw: HashMap<usize, BTreeSet<usize>> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind == ElementKind::GenerateFrame)
        .map(|(i, item)| {
            let enclosed = query
                .enclosed(&item.rect, item.id)
                .into_iter()
                .filter_map(|id| index_of.get(&id).copied())
                .filter(|&j| j != i)
                .collect();
            (i, enclosed)
        })
        .collect();

    let mut sorter = Sorter {
        items,
        raw,
        children: HashMap::new(),
        diagnostics: Vec::new(),
    };
    let all: BTreeSet<usize> = (0..items.len()).collect();
    let top = sorter.resolve_level(&all);
    let mut sequence = Vec::with_capacity(items.len());
    sorter.linearize(top, &mut sequence);
    debug!(elements = items.len(), steps = sequence.len(); "sorted schematic elements");
    SortedSequence {
        items: sequence,
        diagnostics: sorter.diagnostics,
    }
}

struct Sorter<'a> {
    items: &'a [SortItem],
    raw: HashMap<usize, BTreeSet<usize>>,
    children: HashMap<usize, Vec<usize>>,
    diagnostics: Vec<Diagnostic>,
}

impl Sorter<'_> {
    fn is_frame(&self, index: usize) -> bool {
        self.items[index].kind == ElementKind::GenerateFrame
    }

    fn id(&self, index: usize) -> ElementId {
        self.items[index].id
    }

    fn ids(&self, indices: &BTreeSet<usize>) -> String {
        indices
            .iter()
            .map(|&i| self.id(i).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolves the direct members of one level and, recursively, the
    /// children of every frame among them. Returns the direct members in
    /// original order.
    fn resolve_level(&mut self, members: &BTreeSet<usize>) -> Vec<usize> {
        let claims: BTreeMap<usize, BTreeSet<usize>> = members
            .iter()
            .copied()
            .filter(|&i| self.is_frame(i))
            .map(|f| {
                let own = self.raw.get(&f).map_or_else(BTreeSet::new, |raw| {
                    raw.intersection(members).copied().collect()
                });
                (f, own)
            })
            .collect();
        let claimed: BTreeSet<usize> = claims.values().flatten().copied().collect();
        let mut direct: BTreeSet<usize> = members.difference(&claimed).copied().collect();

        let direct_frames = loop {
            let frames: Vec<usize> = direct
                .iter()
                .copied()
                .filter(|&i| self.is_frame(i))
                .collect();
            let mut owners: BTreeMap<usize, usize> = BTreeMap::new();
            for f in &frames {
                for &x in &claims[f] {
                    *owners.entry(x).or_default() += 1;
                }
            }
            let ambiguous: BTreeSet<usize> = owners
                .into_iter()
                .filter(|&(x, count)| count > 1 && !direct.contains(&x))
                .map(|(x, _)| x)
                .collect();
            if ambiguous.is_empty() {
                break frames;
            }
            let message = format!(
                "elements {} lie inside overlapping generate frames",
                self.ids(&ambiguous)
            );
            self.diagnostics.push(
                Diagnostic::warning(AMBIGUOUS_ENCLOSURE, message, Span::DUMMY)
                    .with_help("they are emitted outside of both frames"),
            );
            direct.extend(ambiguous);
        };

        for f in direct_frames {
            let candidates: BTreeSet<usize> = claims[&f].difference(&direct).copied().collect();
            let children = self.resolve_level(&candidates);
            if children.is_empty() {
                let message = format!("generate frame {} encloses no elements", self.id(f));
                self.diagnostics.push(Diagnostic::warning(
                    EMPTY_GENERATE_BODY,
                    message,
                    Span::DUMMY,
                ));
            }
            self.children.insert(f, children);
        }
        direct.into_iter().collect()
    }

    /// Orders one level by priority. Any shared priority keeps the whole
    /// level in original order.
    fn sort_level(&mut self, level: Vec<usize>) -> Vec<usize> {
        let mut by_priority: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for &i in &level {
            if let Some(p) = self.items[i].priority {
                by_priority.entry(p).or_default().push(i);
            }
        }
        let colliding: BTreeSet<usize> = by_priority
            .values()
            .filter(|group| group.len() > 1)
            .flatten()
            .copied()
            .collect();
        if !colliding.is_empty() {
            let message = format!("sibling elements {} share a priority", self.ids(&colliding));
            self.diagnostics.push(
                Diagnostic::warning(DUPLICATE_PRIORITY, message, Span::DUMMY)
                    .with_note("the priorities of this level are ignored"),
            );
            return level;
        }
        let mut sorted: Vec<usize> = by_priority.into_values().flatten().collect();
        sorted.extend(level.iter().filter(|&&i| self.items[i].priority.is_none()));
        sorted
    }

    fn linearize(&mut self, level: Vec<usize>, out: &mut Vec<SequenceItem>) {
        let sorted = self.sort_level(level);
        self.linearize_sorted(sorted, out);
    }

    fn linearize_sorted(&mut self, sorted: Vec<usize>, out: &mut Vec<SequenceItem>) {
        for i in sorted {
            out.push(SequenceItem::Element(self.id(i)));
            if self.is_frame(i) {
                let children = self.children.remove(&i).unwrap_or_default();
                let sorted = self.sort_level(children);
                out.push(SequenceItem::BeginGenerate(
                    sorted.iter().map(|&c| self.id(c)).collect(),
                ));
                self.linearize_sorted(sorted, out);
                out.push(SequenceItem::EndGenerate(self.id(i)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SequenceItem::{BeginGenerate, Element, EndGenerate};

    fn id(raw: u32) -> ElementId {
        ElementId::from_raw(raw)
    }

    fn item(raw: u32, kind: ElementKind, priority: Option<u32>, rect: Rect) -> SortItem {
        SortItem {
            id: id(raw),
            kind,
            priority,
            rect,
        }
    }

    fn block(raw: u32, priority: Option<u32>, x: f64, y: f64) -> SortItem {
        item(
            raw,
            ElementKind::Block,
            priority,
            Rect::new(x, y, x + 10.0, y + 10.0),
        )
    }

    fn frame(raw: u32, x0: f64, y0: f64, x1: f64, y1: f64) -> SortItem {
        item(raw, ElementKind::GenerateFrame, None, Rect::new(x0, y0, x1, y1))
    }

    fn run(items: &[SortItem]) -> SortedSequence {
        sort(items, &GeometricEnclosure::new(items))
    }

    fn codes(sorted: &SortedSequence) -> Vec<String> {
        sorted.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }

    #[test]
    fn priorities_then_original_order() {
        let items = [
            block(0, Some(2), 0.0, 0.0),
            block(1, None, 20.0, 0.0),
            block(2, Some(1), 40.0, 0.0),
            block(3, None, 60.0, 0.0),
        ];
        let sorted = run(&items);
        assert_eq!(
            sorted.items,
            vec![Element(id(2)), Element(id(0)), Element(id(1)), Element(id(3))]
        );
        assert!(sorted.diagnostics.is_empty());
    }

    #[test]
    fn duplicate_priority_keeps_whole_level() {
        let items = [
            block(0, Some(1), 0.0, 0.0),
            block(1, Some(1), 20.0, 0.0),
            block(2, Some(0), 40.0, 0.0),
        ];
        let sorted = run(&items);
        assert_eq!(
            sorted.items,
            vec![Element(id(0)), Element(id(1)), Element(id(2))]
        );
        assert_eq!(codes(&sorted), vec!["W301"]);
        assert!(sorted.diagnostics[0].message.contains("0, 1"));
        assert!(!sorted.diagnostics[0].message.contains('2'));
    }

    #[test]
    fn nested_frames_claim_innermost() {
        let items = [
            block(0, None, 200.0, 200.0),
            frame(1, 0.0, 0.0, 100.0, 100.0),
            frame(2, 10.0, 10.0, 60.0, 60.0),
            block(3, None, 20.0, 20.0),
            block(4, None, 70.0, 70.0),
        ];
        let sorted = run(&items);
        assert_eq!(
            sorted.items,
            vec![
                Element(id(0)),
                Element(id(1)),
                BeginGenerate(vec![id(2), id(4)]),
                Element(id(2)),
                BeginGenerate(vec![id(3)]),
                Element(id(3)),
                EndGenerate(id(2)),
                Element(id(4)),
                EndGenerate(id(1)),
            ]
        );
        assert!(sorted.diagnostics.is_empty());
    }

    #[test]
    fn overlapping_siblings_leave_shared_element_outside() {
        let items = [
            frame(0, 0.0, 0.0, 50.0, 50.0),
            frame(1, 30.0, 0.0, 100.0, 50.0),
            item(2, ElementKind::Block, None, Rect::new(35.0, 10.0, 45.0, 20.0)),
            block(3, None, 5.0, 5.0),
            block(4, None, 60.0, 5.0),
        ];
        let sorted = run(&items);
        assert_eq!(
            sorted.items,
            vec![
                Element(id(0)),
                BeginGenerate(vec![id(3)]),
                Element(id(3)),
                EndGenerate(id(0)),
                Element(id(1)),
                BeginGenerate(vec![id(4)]),
                Element(id(4)),
                EndGenerate(id(1)),
                Element(id(2)),
            ]
        );
        assert_eq!(codes(&sorted), vec!["W303"]);
    }

    #[test]
    fn empty_frame_is_reported() {
        let items = [frame(0, 0.0, 0.0, 50.0, 50.0), block(1, None, 80.0, 80.0)];
        let sorted = run(&items);
        assert_eq!(
            sorted.items,
            vec![
                Element(id(0)),
                BeginGenerate(vec![]),
                EndGenerate(id(0)),
                Element(id(1)),
            ]
        );
        assert_eq!(codes(&sorted), vec!["W302"]);
    }

    #[test]
    fn priorities_inside_frame() {
        let items = [
            frame(0, 0.0, 0.0, 100.0, 100.0),
            block(1, Some(5), 10.0, 10.0),
            block(2, Some(3), 30.0, 10.0),
        ];
        let sorted = run(&items);
        assert_eq!(sorted.items[1], BeginGenerate(vec![id(2), id(1)]));
        assert_eq!(sorted.items[2], Element(id(2)));
    }

    struct FixedEnclosure(HashMap<ElementId, Vec<ElementId>>);

    impl EnclosureQuery for FixedEnclosure {
        fn enclosed(&self, _rect: &Rect, exclude: ElementId) -> Vec<ElementId> {
            self.0.get(&exclude).cloned().unwrap_or_default()
        }
    }

    #[test]
    fn custom_enclosure_query() {
        let items = [
            frame(0, 0.0, 0.0, 1.0, 1.0),
            block(1, None, 500.0, 500.0),
            block(2, None, 600.0, 600.0),
        ];
        let query = FixedEnclosure(HashMap::from([(id(0), vec![id(2), id(0)])]));
        let sorted = sort(&items, &query);
        assert_eq!(
            sorted.items,
            vec![
                Element(id(0)),
                BeginGenerate(vec![id(2)]),
                Element(id(2)),
                EndGenerate(id(0)),
                Element(id(1)),
            ]
        );
    }
}
