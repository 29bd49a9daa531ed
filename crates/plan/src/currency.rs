/// Format a BRL amount as `R$ <value>` with a comma decimal separator.
pub fn format_brl(amount: f64) -> String {
    format!("R$ {}", format!("{amount:.2}").replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_comma_decimal() {
        assert_eq!(format_brl(97.0), "R$ 97,00");
        assert_eq!(format_brl(149.9), "R$ 149,90");
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(format_brl(99.999), "R$ 100,00");
    }
}
