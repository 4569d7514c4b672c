/// Trimmed `value`, or an error naming `field` when nothing is left.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_present_values() {
        assert_eq!(required("reason", "  Checkup ").unwrap(), "Checkup");
    }

    #[test]
    fn rejects_blank_values() {
        assert_eq!(required("reason", "   ").unwrap_err(), "reason is required");
        assert!(required("reason", "").is_err());
    }
}
