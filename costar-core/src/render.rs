use crate::model::PathStep;
use crate::text::capitalize_words;

/// A shortest path formatted for display
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedPath {
    pub header: String,
    pub lines: Vec<String>,
}

impl RenderedPath {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

pub fn path_header(len: usize) -> String {
    format!("Shortest path length: {}", len)
}

pub fn format_step(step: &PathStep) -> String {
    format!(
        "{} acted in {} with {}",
        capitalize_words(&step.actor_1),
        step.movie,
        capitalize_words(&step.actor_2)
    )
}

/// Format steps in path order
pub fn render_path(steps: &[PathStep]) -> RenderedPath {
    RenderedPath {
        header: path_header(steps.len()),
        lines: steps.iter().map(format_step).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(a: &str, movie: &str, b: &str) -> PathStep {
        PathStep {
            actor_1: a.into(),
            movie: movie.into(),
            actor_2: b.into(),
        }
    }

    #[test]
    fn test_single_step() {
        let rendered = render_path(&[step("keanu reeves", "The Matrix", "carrie-anne moss")]);
        assert_eq!(rendered.header, "Shortest path length: 1");
        assert_eq!(
            rendered.lines,
            vec!["Keanu Reeves acted in The Matrix with Carrie-Anne Moss"]
        );
    }

    #[test]
    fn test_order_and_movie_verbatim() {
        let rendered = render_path(&[
            step("tom cruise", "top gun", "val kilmer"),
            step("val kilmer", "Heat", "al pacino"),
        ]);
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered.lines[0], "Tom Cruise acted in top gun with Val Kilmer");
        assert_eq!(rendered.lines[1], "Val Kilmer acted in Heat with Al Pacino");
    }
}
