// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::hash::{Hash, Hasher};
use std::rc::Rc;

use fxhash::FxHashSet;

use crate::Vertex;

/// One state of the exact dynamic program: a candidate discrete control
/// assignment ending at `vertex`, compressed down to what any future decision
/// can depend on. Two labels at the same vertex with the same current
/// control, the same prefix window and the same control sums are
/// interchangeable for every future decision; only their cost tells them
/// apart.
///
/// Labels share their ancestry: many live labels may reference a common
/// suffix of predecessors, forming a branching (never cyclic, since
/// predecessors always point strictly earlier in the vertex order) history
/// tree. Releasing a frontier drops the last strong reference to the dead
/// branches.
#[derive(Debug)]
pub struct ExactLabel {
    predecessor: Option<Rc<ExactLabel>>,
    vertex: Vertex,
    /// Cumulative count of the vertices assigned to each control category,
    /// from the source through `vertex`.
    control_sums: Vec<usize>,
    current_control: usize,
    cost: f64,
    /// The last `W(vertex)` chosen control indices, oldest first. Entries
    /// reaching back past the source are `None`.
    prefix: Vec<Option<usize>>,
}

impl ExactLabel {
    /// The label seeding the source vertex with `current_control`.
    pub fn root(
        current_control: usize,
        vertex: Vertex,
        dimension: usize,
        prefix_length: usize,
    ) -> Self {
        let mut control_sums = vec![0; dimension];
        control_sums[current_control] += 1;

        let mut prefix = vec![None; prefix_length];
        prefix[prefix_length - 1] = Some(current_control);

        Self { predecessor: None, vertex, control_sums, current_control, cost: 0.0, prefix }
    }

    /// Extends `predecessor` to `vertex` with the choice `current_control`.
    /// The new prefix window keeps the most recent entries of the
    /// predecessor's window and appends the choice; `cost` is the total cost
    /// of the extended assignment.
    pub fn extend(
        predecessor: &Rc<ExactLabel>,
        current_control: usize,
        vertex: Vertex,
        cost: f64,
        prefix_length: usize,
    ) -> Self {
        let pred_length = predecessor.prefix.len();
        debug_assert!(pred_length + 1 >= prefix_length);

        let mut prefix = vec![None; prefix_length];
        let keep = pred_length + 1 - prefix_length;
        for (slot, value) in prefix.iter_mut().zip(predecessor.prefix[keep..].iter().copied()) {
            *slot = value;
        }
        prefix[prefix_length - 1] = Some(current_control);

        let mut control_sums = predecessor.control_sums.clone();
        control_sums[current_control] += 1;

        Self {
            predecessor: Some(Rc::clone(predecessor)),
            vertex,
            control_sums,
            current_control,
            cost,
            prefix,
        }
    }

    #[inline]
    pub fn vertex(&self) -> Vertex {
        self.vertex
    }

    #[inline]
    pub fn current_control(&self) -> usize {
        self.current_control
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn control_sums(&self) -> &[usize] {
        &self.control_sums
    }

    #[inline]
    pub fn prefix(&self) -> &[Option<usize>] {
        &self.prefix
    }

    #[inline]
    pub fn predecessor(&self) -> Option<&Rc<ExactLabel>> {
        self.predecessor.as_ref()
    }
}

/// The dominance key of a label within its bucket: two labels compare equal
/// iff their prefix windows and control sums agree. Cost and ancestry stay
/// out of the comparison so that a dominance collision surfaces as a hash set
/// collision.
#[derive(Debug, Clone)]
pub(crate) struct LabelKey(pub Rc<ExactLabel>);

impl Hash for LabelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.prefix.hash(state);
        self.0.control_sums.hash(state);
    }
}

impl PartialEq for LabelKey {
    fn eq(&self, other: &Self) -> bool {
        debug_assert_eq!(self.0.vertex, other.0.vertex);
        debug_assert_eq!(self.0.current_control, other.0.current_control);

        self.0.prefix == other.0.prefix && self.0.control_sums == other.0.control_sums
    }
}

impl Eq for LabelKey {}

/// One bucket of a frontier: the deduplicated labels sharing one current
/// control value.
pub(crate) type LabelSet = FxHashSet<LabelKey>;

/// The frontier of one vertex: one bucket per control category.
pub(crate) type LabelFrontier = Vec<LabelSet>;

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::LabelKey;
    use crate::{ExactLabel, Vertex};

    #[test]
    fn a_root_label_pads_its_window_with_none() {
        let label = ExactLabel::root(1, Vertex(0), 2, 3);

        assert_eq!(&[None, None, Some(1)], label.prefix());
        assert_eq!(&[0, 1], label.control_sums());
        assert_eq!(0.0, label.cost());
        assert!(label.predecessor().is_none());
    }

    #[test]
    fn extending_drops_the_oldest_entry_and_appends_the_choice() {
        let root = Rc::new(ExactLabel::root(1, Vertex(0), 2, 2));
        let next = ExactLabel::extend(&root, 0, Vertex(1), 0.5, 2);

        assert_eq!(&[Some(1), Some(0)], next.prefix());
        assert_eq!(&[1, 1], next.control_sums());
        assert_eq!(0.5, next.cost());
        assert_eq!(Vertex(1), next.vertex());
    }

    #[test]
    fn the_window_may_grow_by_one_position() {
        let root = Rc::new(ExactLabel::root(0, Vertex(0), 2, 1));
        let next = ExactLabel::extend(&root, 1, Vertex(1), 0.0, 2);

        assert_eq!(&[Some(0), Some(1)], next.prefix());
    }

    #[test]
    fn the_window_may_shrink_and_forget_old_history() {
        let root = Rc::new(ExactLabel::root(0, Vertex(0), 3, 3));
        let next = ExactLabel::extend(&root, 1, Vertex(1), 0.0, 1);

        assert_eq!(&[Some(1)], next.prefix());
    }

    #[test]
    fn keys_ignore_cost_and_ancestry() {
        let cheap = Rc::new(ExactLabel::root(0, Vertex(0), 2, 1));
        let other = Rc::new(ExactLabel::root(1, Vertex(0), 2, 1));

        let expensive = {
            // same window and sums as `cheap` extended, different cost
            let a = ExactLabel::extend(&cheap, 1, Vertex(1), 1.0, 1);
            let b = ExactLabel::extend(&other, 1, Vertex(1), 2.0, 1);
            (Rc::new(a), Rc::new(b))
        };

        assert_ne!(expensive.0.cost(), expensive.1.cost());
        assert_ne!(
            LabelKey(Rc::clone(&expensive.0)),
            LabelKey(Rc::clone(&expensive.1))
        );

        // equal sums and window: the keys collide no matter the cost
        let c = Rc::new(ExactLabel::extend(&cheap, 1, Vertex(1), 5.0, 1));
        assert_eq!(LabelKey(Rc::clone(&expensive.0)), LabelKey(c));
    }
}
