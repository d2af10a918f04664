//! Text helpers shared by the components

/// Column header text for a field key: underscores become spaces, upper-cased
///
/// # Examples
///
/// ```
/// use timetable_pages::components::text::title_label;
///
/// assert_eq!(title_label("dia_da_semana"), "DIA DA SEMANA");
/// ```
pub fn title_label(key: &str) -> String {
	key.replace('_', " ").to_uppercase()
}

/// Whether a field key names a time value
pub fn contains_hour(key: &str) -> bool {
	key.to_lowercase().contains("hora")
}

/// Format typed input as `HH:MM`
///
/// Non-digits are dropped and a colon is inserted after the hours. When the
/// hours exceed 23 or the minutes exceed 59 the last typed digit is
/// rejected.
///
/// # Examples
///
/// ```
/// use timetable_pages::components::text::mask_time;
///
/// assert_eq!(mask_time("0930"), "09:30");
/// assert_eq!(mask_time("12:7"), "12:7");
/// assert_eq!(mask_time("127"), "12:7");
/// assert_eq!(mask_time("1275"), "12:7");
/// ```
pub fn mask_time(input: &str) -> String {
	let digits: String = input
		.chars()
		.filter(char::is_ascii_digit)
		.take(4)
		.collect();
	if digits.is_empty() {
		return digits;
	}

	let mut value = if digits.len() > 2 {
		format!("{}:{}", &digits[..2], &digits[2..])
	} else {
		digits
	};

	let mut parts = value.split(':');
	let hours = parts.next().map_or(0, parse_or_zero);
	let minutes = parts.next().map_or(0, parse_or_zero);
	if hours > 23 || minutes > 59 {
		value.pop();
	}
	value
}

fn parse_or_zero(part: &str) -> u32 {
	part.parse().unwrap_or(0)
}
