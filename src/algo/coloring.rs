/*!
# Vertex Colorings

A [`Coloring`] assigns each node `u` of a graph a color in `1..=k` such that every color is used.
Color classes are addressed by color, i.e. class `c` is found at index `c - 1`.
*/

use itertools::Itertools;

use super::*;

/// Colors are numbered `1..=k`
pub type Color = u32;

/// A surjective assignment of the colors `1..=k` to the nodes `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coloring {
    colors: Vec<Color>,
    number_of_colors: Color,
}

impl Coloring {
    /// Creates a coloring with `number_of_colors` colors.
    /// Fails if a color lies outside of `1..=number_of_colors` or is never used.
    pub fn new(colors: Vec<Color>, number_of_colors: Color) -> Result<Self, ColoringError> {
        let mut used = vec![false; number_of_colors as usize + 1];
        for (u, &color) in colors.iter().enumerate() {
            if color == 0 || color > number_of_colors {
                return Err(ColoringError::ColorOutOfRange {
                    node: u as Node,
                    color,
                    number_of_colors,
                });
            }
            used[color as usize] = true;
        }

        if let Some(c) = (1..=number_of_colors).find(|&c| !used[c as usize]) {
            return Err(ColoringError::UnusedColor(c));
        }

        Ok(Self::new_unchecked(colors, number_of_colors))
    }

    /// Creates a coloring whose number of colors is the largest color used
    pub fn from_colors(colors: Vec<Color>) -> Result<Self, ColoringError> {
        let k = colors.iter().copied().max().unwrap_or(0);
        Self::new(colors, k)
    }

    /// Assigns color `1` to all `n` nodes
    pub fn trivial(n: NumNodes) -> Self {
        Self::new_unchecked(vec![1; n as usize], (n > 0) as Color)
    }

    pub(crate) fn new_unchecked(colors: Vec<Color>, number_of_colors: Color) -> Self {
        debug_assert!(colors.iter().all(|&c| (1..=number_of_colors).contains(&c)));
        Self {
            colors,
            number_of_colors,
        }
    }

    /// Checks that the coloring covers exactly the nodes of `graph`
    pub fn validate_for<G: GraphNodeOrder>(&self, graph: &G) -> Result<(), ColoringError> {
        if self.colors.len() != graph.len() {
            return Err(ColoringError::WrongDomain {
                expected: graph.number_of_nodes(),
                actual: self.colors.len(),
            });
        }
        Ok(())
    }

    /// ** Panics if `u >= n` **
    pub fn color_of(&self, u: Node) -> Color {
        self.colors[u as usize]
    }

    pub fn number_of_colors(&self) -> Color {
        self.number_of_colors
    }

    /// Returns the colors of all nodes, indexed by node
    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    /// Returns the number of colored nodes
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the nodes of every color class in increasing order; class `c` is at index `c - 1`
    pub fn color_classes(&self) -> Vec<Vec<Node>> {
        let mut classes = vec![Vec::new(); self.number_of_colors as usize];
        for (u, &c) in self.colors.iter().enumerate() {
            classes[c as usize - 1].push(u as Node);
        }
        classes
    }

    /// Returns the size of every color class; class `c` is at index `c - 1`
    pub fn class_sizes(&self) -> Vec<NumNodes> {
        let mut sizes = vec![0; self.number_of_colors as usize];
        for &c in &self.colors {
            sizes[c as usize - 1] += 1;
        }
        sizes
    }

    /// Returns *true* if every node has its own color
    pub fn is_discrete(&self) -> bool {
        self.number_of_colors as usize == self.colors.len()
    }

    /// Returns a copy where `u` moved to the fresh color `k + 1`.
    /// If `u` is already alone in its class, the coloring is returned unchanged.
    /// ** Panics if `u >= n` **
    #[must_use]
    pub fn individualized(&self, u: Node) -> Self {
        let c = self.color_of(u);
        if self.colors.iter().filter(|&&x| x == c).count() == 1 {
            return self.clone();
        }

        let mut colors = self.colors.clone();
        colors[u as usize] = self.number_of_colors + 1;
        Self::new_unchecked(colors, self.number_of_colors + 1)
    }

    pub fn into_vec(self) -> Vec<Color> {
        self.colors
    }
}

impl std::fmt::Display for Coloring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} colors: [{}]",
            self.number_of_colors,
            self.colors.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(Coloring::new(vec![1, 2, 2, 1], 2).is_ok());
        assert_eq!(
            Coloring::new(vec![1, 3, 1], 2),
            Err(ColoringError::ColorOutOfRange {
                node: 1,
                color: 3,
                number_of_colors: 2
            })
        );
        assert_eq!(
            Coloring::new(vec![1, 0], 1),
            Err(ColoringError::ColorOutOfRange {
                node: 1,
                color: 0,
                number_of_colors: 1
            })
        );
        assert_eq!(
            Coloring::new(vec![1, 3, 1], 3),
            Err(ColoringError::UnusedColor(2))
        );
        assert_eq!(Coloring::from_colors(vec![2, 1, 2]).unwrap().number_of_colors(), 2);
        assert_eq!(Coloring::from_colors(vec![]).unwrap().number_of_colors(), 0);

        let graph = AdjArray::new(3);
        assert_eq!(
            Coloring::trivial(4).validate_for(&graph),
            Err(ColoringError::WrongDomain {
                expected: 3,
                actual: 4
            })
        );
        assert!(Coloring::trivial(3).validate_for(&graph).is_ok());
    }

    #[test]
    fn classes() {
        let coloring = Coloring::new(vec![2, 1, 3, 1, 2], 3).unwrap();
        assert_eq!(coloring.color_classes(), vec![vec![1, 3], vec![0, 4], vec![2]]);
        assert_eq!(coloring.class_sizes(), vec![2, 2, 1]);
        assert!(!coloring.is_discrete());
        assert_eq!(format!("{coloring}"), "3 colors: [2, 1, 3, 1, 2]");

        let ind = coloring.individualized(4);
        assert_eq!(ind.as_slice(), &[2, 1, 3, 1, 4]);
        assert_eq!(ind.number_of_colors(), 4);
        assert_eq!(ind.individualized(4), ind);

        assert!(Coloring::trivial(1).is_discrete());
        assert!(Coloring::trivial(0).is_discrete());
        assert_eq!(Coloring::trivial(0).number_of_colors(), 0);
    }
}
