/// Union of ordered, open route segments. Every task index lives in exactly
/// one group; merging joins two groups end-to-end, so a task never gains
/// more than two route neighbours and no group ever closes into a cycle.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    groups: Vec<Vec<usize>>,
}

impl RouteGraph {
    pub fn new(num_tasks: usize) -> Self {
        Self {
            groups: (0..num_tasks).map(|task| vec![task]).collect(),
        }
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Size of the group currently containing `vert`, 0 if unknown.
    pub fn load(&self, vert: usize) -> usize {
        self.locate(vert)
            .map(|(group, _)| self.groups[group].len())
            .unwrap_or(0)
    }

    /// Join the groups holding `a` and `b` by those two elements. Succeeds
    /// only when both are endpoints of distinct groups; one side is
    /// reversed as needed so the joined endpoints end up adjacent.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        let (loc_a, loc_b) = match (self.locate(a), self.locate(b)) {
            (Some(loc_a), Some(loc_b)) => (loc_a, loc_b),
            _ => return false,
        };
        let (group_a, offset_a) = loc_a;
        let (group_b, offset_b) = loc_b;
        if group_a == group_b {
            return false;
        }

        let a_head = offset_a == 0;
        let a_tail = offset_a == self.groups[group_a].len() - 1;
        let b_head = offset_b == 0;
        let b_tail = offset_b == self.groups[group_b].len() - 1;

        let mut other = self.groups[group_b].clone();
        let merged = if a_tail && (b_head || b_tail) {
            // Extend our tail: other joins forward, or reversed when we
            // grabbed it by its own tail.
            if !b_head {
                other.reverse();
            }
            let mut merged = self.groups[group_a].clone();
            merged.append(&mut other);
            merged
        } else if a_head && (b_head || b_tail) {
            // Extend our head: other is prepended, reversed when we
            // grabbed it by its own head.
            if b_head {
                other.reverse();
            }
            other.extend(self.groups[group_a].iter().copied());
            other
        } else {
            // One of the two is an interior element; the route cannot
            // branch there.
            return false;
        };

        self.groups[group_a] = merged;
        self.groups.remove(group_b);
        true
    }

    /// The biggest group, first one on ties. This is the route handed out
    /// when merging runs out of savings without filling a vehicle.
    pub fn largest_group(&self) -> Option<&[usize]> {
        let mut best: Option<&Vec<usize>> = None;
        for group in &self.groups {
            match best {
                Some(current) if current.len() >= group.len() => {}
                _ => best = Some(group),
            }
        }
        best.map(|group| group.as_slice())
    }

    /// A group that exactly fills `capacity`, if any — the early-exit
    /// probe the clusterer checks before spending more savings entries.
    pub fn full_group(&self, capacity: usize) -> Option<&[usize]> {
        self.groups
            .iter()
            .find(|group| group.len() == capacity)
            .map(|group| group.as_slice())
    }

    fn locate(&self, vert: usize) -> Option<(usize, usize)> {
        for (index, group) in self.groups.iter().enumerate() {
            if let Some(offset) = group.iter().position(|&item| item == vert) {
                return Some((index, offset));
            }
        }
        None
    }
}
