use rand::Rng;

use viewer_chart_builder_api::Color;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

pub fn random_color() -> Color {
    random_color_with(&mut rand::rng())
}

pub fn random_color_with<R: Rng>(rng: &mut R) -> Color {
    let hex: String = (0..6)
        .map(|_| HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())] as char)
        .collect();
    Color::new(format!("#{hex}"))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn is_hex_color(color: &Color) -> bool {
        let color = color.as_str();
        color.len() == 7
            && color.starts_with('#')
            && color[1..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    }

    #[test]
    fn test_random_color_format() {
        for _ in 0..1000 {
            let color = random_color();
            assert!(is_hex_color(&color), "unexpected color {color}");
        }
    }

    #[test]
    fn test_seeded_color_is_reproducible() {
        let first = random_color_with(&mut StdRng::seed_from_u64(42));
        let second = random_color_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert!(is_hex_color(&first));
    }
}
