use super::datatypes::{non_empty, CodeableConcept, Dosage, Quantity, TimingRepeat};
use super::resources::{Observation, ObservationComponent};

/// Renders a resource into human-readable finding lines.
pub trait ToFindings {
    fn to_findings(&self) -> Vec<String>;
}

impl ToFindings for Observation {
    /// One line for the top-level value, then one per valued component.
    /// An observation without any value renders nothing.
    fn to_findings(&self) -> Vec<String> {
        let label = concept_label(self.code.as_ref(), "Result");
        let mut lines = Vec::new();

        if let Some(value) = render_value(
            self.value_quantity.as_ref(),
            self.value_string.as_deref(),
            self.value_codeable_concept.as_ref(),
        ) {
            lines.push(format!("{}: {}", label, value));
        }

        lines.extend(self.component.iter().filter_map(ObservationComponent::finding));
        lines
    }
}

impl ObservationComponent {
    fn finding(&self) -> Option<String> {
        let label = concept_label(self.code.as_ref(), "Component");
        render_value(
            self.value_quantity.as_ref(),
            self.value_string.as_deref(),
            self.value_codeable_concept.as_ref(),
        )
        .map(|value| format!("{}: {}", label, value))
    }
}

fn concept_label(concept: Option<&CodeableConcept>, default: &str) -> String {
    concept
        .and_then(CodeableConcept::label)
        .unwrap_or(default)
        .to_string()
}

// valueQuantity wins over valueString, which wins over valueCodeableConcept
fn render_value(
    quantity: Option<&Quantity>,
    string: Option<&str>,
    concept: Option<&CodeableConcept>,
) -> Option<String> {
    if let Some(rendered) = quantity.and_then(|q| render_quantity(q, " ")) {
        return Some(rendered);
    }
    if let Some(text) = non_empty(string) {
        return Some(text.to_string());
    }
    concept.and_then(CodeableConcept::label).map(str::to_string)
}

/// `"<value><sep><unit>"`, or just the value when no unit is recorded.
pub fn render_quantity(quantity: &Quantity, separator: &str) -> Option<String> {
    let value = quantity.value?;
    Some(match quantity.unit_label() {
        Some(unit) => format!("{}{}{}", value, separator, unit),
        None => value.to_string(),
    })
}

/// Dose string from the first dosage entry: `doseQuantity` (`"500mg"`),
/// then dosage text, then "As directed".
pub fn render_dose(dosage: &[Dosage]) -> String {
    let first = match dosage.first() {
        Some(first) => first,
        None => return "As directed".to_string(),
    };

    first
        .dose_and_rate
        .iter()
        .filter_map(|dr| dr.dose_quantity.as_ref())
        .find_map(|q| render_quantity(q, ""))
        .or_else(|| non_empty(first.text.as_deref()).map(str::to_string))
        .unwrap_or_else(|| "As directed".to_string())
}

/// Frequency from the first dosage entry: structured timing repeat, then
/// the timing code, then dosage text, then "As directed".
pub fn render_frequency(dosage: &[Dosage]) -> String {
    let first = match dosage.first() {
        Some(first) => first,
        None => return "As directed".to_string(),
    };
    let timing = first.timing.as_ref();

    timing
        .and_then(|t| t.repeat.as_ref())
        .and_then(render_repeat)
        .or_else(|| timing.and_then(|t| t.code.as_ref()).and_then(CodeableConcept::label).map(str::to_string))
        .or_else(|| non_empty(first.text.as_deref()).map(str::to_string))
        .or_else(|| first.as_needed_boolean.filter(|b| *b).map(|_| "As needed".to_string()))
        .unwrap_or_else(|| "As directed".to_string())
}

fn render_repeat(repeat: &TimingRepeat) -> Option<String> {
    let frequency = repeat.frequency?;
    let period = repeat.period.unwrap_or(1.0);
    let unit = match repeat.period_unit.as_deref()? {
        "s" => "second",
        "min" => "minute",
        "h" => "hour",
        "d" => "day",
        "wk" => "week",
        "mo" => "month",
        "a" => "year",
        _ => return None,
    };

    if period == 1.0 {
        let adverb = match unit {
            "hour" => "hourly".to_string(),
            "day" => "daily".to_string(),
            "week" => "weekly".to_string(),
            "month" => "monthly".to_string(),
            "year" => "yearly".to_string(),
            other => format!("per {}", other),
        };
        let times = match frequency {
            1 => "Once".to_string(),
            2 => "Twice".to_string(),
            n => format!("{} times", n),
        };
        return Some(format!("{} {}", times, adverb));
    }

    if frequency == 1 {
        Some(format!("Every {} {}s", period, unit))
    } else {
        Some(format!("{} times every {} {}s", frequency, period, unit))
    }
}
