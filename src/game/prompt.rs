/// The fixed list of things the player can be asked to draw. Each name also
/// selects the overlay animation asset shown next to the canvas.
pub const PROMPTS: [&str; 5] = ["Cat", "House", "Tree", "Car", "Sun"];

/// Picks one prompt uniformly at random.
pub fn random_prompt() -> &'static str {
    PROMPTS[fastrand::usize(..PROMPTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_prompt_is_from_the_fixed_list() {
        for _ in 0..100 {
            assert!(PROMPTS.contains(&random_prompt()));
        }
    }
}
