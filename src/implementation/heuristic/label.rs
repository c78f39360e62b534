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

/// A state of the heuristic labeling scheme. Compared to the exact label it
/// forgets the prefix window entirely: two labels at the same vertex with the
/// same control histogram are merged even when their recent histories (and
/// hence their future switching costs) differ. The full ancestry chain is
/// still kept, since the cost accounting needs the controls of the target's
/// predecessor vertices.
#[derive(Debug)]
pub struct HeuristicLabel {
    predecessor: Option<Rc<HeuristicLabel>>,
    vertex: Vertex,
    control_sums: Vec<usize>,
    current_control: usize,
    cost: f64,
}

impl HeuristicLabel {
    pub fn root(current_control: usize, vertex: Vertex, dimension: usize) -> Self {
        let mut control_sums = vec![0; dimension];
        control_sums[current_control] += 1;

        Self { predecessor: None, vertex, control_sums, current_control, cost: 0.0 }
    }

    pub fn extend(
        predecessor: &Rc<HeuristicLabel>,
        current_control: usize,
        vertex: Vertex,
        cost: f64,
    ) -> Self {
        let mut control_sums = predecessor.control_sums.clone();
        control_sums[current_control] += 1;

        Self {
            predecessor: Some(Rc::clone(predecessor)),
            vertex,
            control_sums,
            current_control,
            cost,
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
    pub fn predecessor(&self) -> Option<&Rc<HeuristicLabel>> {
        self.predecessor.as_ref()
    }
}

/// The dominance key of a heuristic label: the control histogram alone.
#[derive(Debug, Clone)]
pub(crate) struct LabelKey(pub Rc<HeuristicLabel>);

impl Hash for LabelKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.control_sums.hash(state);
    }
}

impl PartialEq for LabelKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.control_sums == other.0.control_sums
    }
}

impl Eq for LabelKey {}

pub(crate) type LabelSet = FxHashSet<LabelKey>;

pub(crate) type LabelFrontier = Vec<LabelSet>;

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::LabelKey;
    use crate::{HeuristicLabel, Vertex};

    #[test]
    fn labels_with_equal_histograms_collide_regardless_of_history() {
        let a = Rc::new(HeuristicLabel::root(0, Vertex(0), 2));
        let b = Rc::new(HeuristicLabel::root(1, Vertex(0), 2));

        // 0 then 1 and 1 then 0 end up with the same histogram
        let a1 = Rc::new(HeuristicLabel::extend(&a, 1, Vertex(1), 1.0));
        let b0 = Rc::new(HeuristicLabel::extend(&b, 0, Vertex(1), 2.0));

        assert_eq!(LabelKey(a1), LabelKey(b0));
    }

    #[test]
    fn different_histograms_do_not_collide() {
        let a = Rc::new(HeuristicLabel::root(0, Vertex(0), 2));
        let a0 = Rc::new(HeuristicLabel::extend(&a, 0, Vertex(1), 0.0));
        let a1 = Rc::new(HeuristicLabel::extend(&a, 1, Vertex(1), 0.0));

        assert_ne!(LabelKey(a0), LabelKey(a1));
    }
}
