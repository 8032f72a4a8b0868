//! Scoreboard arithmetic.

/// Runs per six balls, rounded to two decimals. Zero before the first ball.
pub fn run_rate(score: u32, balls_bowled: u32) -> f64 {
    if balls_bowled == 0 {
        return 0.0;
    }
    let rate = score as f64 / balls_bowled as f64 * 6.0;
    (rate * 100.0).round() / 100.0
}

pub fn runs_needed(target: u32, chasing_score: u32) -> u32 {
    target.saturating_sub(chasing_score)
}

pub fn format_run_rate(rate: f64) -> String {
    format!("{rate:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_rate_zero_balls() {
        assert_eq!(run_rate(0, 0), 0.0);
        assert_eq!(run_rate(12, 0), 0.0);
        assert_eq!(format_run_rate(run_rate(12, 0)), "0.00");
    }

    #[test]
    fn test_run_rate_rounds_to_two_places() {
        assert_eq!(run_rate(12, 3), 24.0);
        // 7 / 3 * 6 = 14.0
        assert_eq!(run_rate(7, 3), 14.0);
        // 5 / 7 * 6 = 4.2857...
        assert_eq!(run_rate(5, 7), 4.29);
        assert_eq!(format_run_rate(run_rate(5, 7)), "4.29");
    }

    #[test]
    fn test_runs_needed_never_negative() {
        assert_eq!(runs_needed(13, 0), 13);
        assert_eq!(runs_needed(13, 12), 1);
        assert_eq!(runs_needed(13, 13), 0);
        assert_eq!(runs_needed(13, 17), 0);
    }
}
