/*
 * Copyright (c) 2022 Frank Fischer <frank-fischer@shadow-soft.de>
 *
 * This program is free software: you can redistribute it and/or
 * modify it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
 * General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see  <http://www.gnu.org/licenses/>
 */

//! The set of active nodes.

/// The set of nodes with positive excess.
///
/// For the algorithm this is just a set without any order, nodes are
/// returned last-in-first-out because that is simplest. The set is only
/// touched by the coordinating thread between two rounds.
#[derive(Clone, Debug, Default)]
pub struct ActiveSet {
    nodes: Vec<usize>,
}

impl ActiveSet {
    pub fn with_capacity(n: usize) -> Self {
        ActiveSet {
            nodes: Vec::with_capacity(n),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear()
    }

    /// Put `u` in front of the set.
    pub fn enter(&mut self, u: usize) {
        self.nodes.push(u)
    }

    /// Take the first node of the set, or `None` if it is empty.
    pub fn leave(&mut self) -> Option<usize> {
        self.nodes.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::ActiveSet;

    #[test]
    fn lifo() {
        let mut a = ActiveSet::default();
        assert_eq!(a.leave(), None);
        a.enter(3);
        a.enter(1);
        a.enter(2);
        assert_eq!(a.len(), 3);
        assert_eq!(a.leave(), Some(2));
        assert_eq!(a.leave(), Some(1));
        assert_eq!(a.leave(), Some(3));
        assert!(a.is_empty());
    }
}
