use dough_recipe::{LegKind, Recipe};

/// Human-readable shopping list for `recipe`, one ingredient per line.
pub fn render_text(recipe: &Recipe) -> String {
    let mut lines = vec![
        format!("Flour: {}g", whole_grams(recipe.flour_weight())),
        format!("Water: {}g", whole_grams(recipe.water_weight())),
        format!("Salt: {}g", whole_grams(recipe.salt_weight())),
        format!("Oil: {}g", whole_grams(recipe.oil_weight())),
        format!(
            "Yeast: {}g of {}",
            format_yeast_weight(recipe.yeast_weight()),
            recipe.yeast_type()
        ),
    ];

    for (leg, label) in [(LegKind::Fridge, "Cold Proof"), (LegKind::Room, "Room Proof")] {
        let setting = recipe.leg(leg);
        if setting.hours != 0 && setting.temperature != 0.0 {
            lines.push(format!(
                "{label}: {} hours at {:.1}°C",
                setting.hours, setting.temperature
            ));
        }
    }

    lines.push(format!(
        "Total: {} dough balls, each weighing {}g",
        recipe.number_of_balls(),
        float_display(recipe.ball_weight())
    ));

    lines.join("\n")
}

/// Three decimals with trailing zeros dropped, keeping at least one
/// fractional digit: `0.885`, `1.5`, `2.0`.
pub fn format_yeast_weight(weight: f64) -> String {
    let mut formatted = format!("{weight:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.').len();
    formatted.truncate(trimmed);
    if !formatted.contains('.') {
        formatted.push_str(".0");
    }
    formatted
}

// Rounds half away from zero.
fn whole_grams(weight: f64) -> i64 {
    weight.round() as i64
}

fn float_display(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yeast_weight_keeps_one_fractional_digit() {
        assert_eq!(format_yeast_weight(0.88496), "0.885");
        assert_eq!(format_yeast_weight(1.5), "1.5");
        assert_eq!(format_yeast_weight(2.0), "2.0");
        assert_eq!(format_yeast_weight(2.0004), "2.0");
        assert_eq!(format_yeast_weight(10.0), "10.0");
    }

    #[test]
    fn grams_round_half_away_from_zero() {
        assert_eq!(whole_grams(14.5), 15);
        assert_eq!(whole_grams(383.48), 383);
    }

    #[test]
    fn ball_weight_shows_a_decimal_point() {
        assert_eq!(float_display(250.0), "250.0");
        assert_eq!(float_display(262.5), "262.5");
    }
}
