// src/presenter/salary.rs
use crate::types::JobRecord;
use crate::utils::format_thousands;

// Beyond this f64 stops holding every integer exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Thousands separators for whole amounts, the raw value otherwise.
pub fn format_amount(amount: f64) -> String {
    if amount.is_finite() && amount.fract() == 0.0 && amount.abs() <= MAX_EXACT_INTEGER {
        format_thousands(amount as i64)
    } else {
        amount.to_string()
    }
}

/// "$min - $max (interval)" with whatever parts are present. `None` when the
/// record carries no amount at all.
pub fn salary_range(record: &JobRecord) -> Option<String> {
    let mut range = match (record.min_amount, record.max_amount) {
        (Some(min), Some(max)) => format!("${} - ${}", format_amount(min), format_amount(max)),
        (Some(min), None) => format!("${}", format_amount(min)),
        (None, Some(max)) => format!("${}", format_amount(max)),
        (None, None) => return None,
    };

    if let Some(interval) = &record.interval {
        range.push_str(&format!(" ({})", interval));
    }

    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalaryInterval;

    fn record(min: Option<f64>, max: Option<f64>, interval: Option<SalaryInterval>) -> JobRecord {
        JobRecord::new("indeed", "Engineer", "Acme", "Remote", "https://x").with_salary(
            min,
            max,
            interval,
        )
    }

    #[test]
    fn test_full_range_with_interval() {
        let r = record(Some(50000.0), Some(70000.0), Some(SalaryInterval::Yearly));
        assert_eq!(salary_range(&r).unwrap(), "$50,000 - $70,000 (yearly)");
    }

    #[test]
    fn test_single_bound() {
        assert_eq!(salary_range(&record(None, Some(90000.0), None)).unwrap(), "$90,000");
        assert_eq!(
            salary_range(&record(Some(45.0), None, Some(SalaryInterval::Hourly))).unwrap(),
            "$45 (hourly)"
        );
    }

    #[test]
    fn test_no_amounts_means_no_line() {
        assert_eq!(salary_range(&record(None, None, Some(SalaryInterval::Yearly))), None);
    }

    #[test]
    fn test_fractional_amount_is_raw() {
        assert_eq!(format_amount(27.5), "27.5");
        assert_eq!(format_amount(1_250_000.0), "1,250,000");
    }
}
