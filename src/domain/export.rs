//! CSV export of the filtered and sorted participant set.
//!
//! Every cell is double-quoted with embedded quotes doubled, so commas,
//! quotes and newlines inside values survive intact. Rows are joined with
//! `\n` and the output carries no trailing newline.

use chrono::NaiveDate;

use super::participant::Participant;

/// Column header row, in output order.
pub const HEADER: [&str; 13] = [
    "Name",
    "TaxId",
    "Email",
    "Phone",
    "Company",
    "RevenueBracket",
    "Sector",
    "City",
    "State",
    "RegistrationTier",
    "PaymentStatus",
    "RegistrationDate",
    "AttendanceConfirmed",
];

const DATE_FORMAT: &str = "%B %-d, %Y %H:%M:%S UTC";

/// Renders `rows` as CSV, header first.
#[must_use]
pub fn to_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut lines = vec![encode_row(HEADER.iter().map(|h| (*h).to_string()))];
    lines.extend(rows.into_iter().map(|p| encode_row(cells(p))));
    lines.join("\n")
}

/// Download file name for an export produced on `date`.
#[must_use]
pub fn file_name(date: NaiveDate) -> String {
    format!("participants_event_{}.csv", date.format("%Y-%m-%d"))
}

fn cells(p: &Participant) -> [String; 13] {
    [
        p.full_name.clone(),
        p.tax_id.clone(),
        p.email.clone(),
        p.phone.clone(),
        p.company_name.clone().unwrap_or_default(),
        p.revenue_bracket
            .map(|b| b.label().to_string())
            .unwrap_or_default(),
        p.sector.map(|s| s.label().to_string()).unwrap_or_default(),
        p.city.clone(),
        p.state.clone(),
        p.tier.as_str().to_string(),
        p.payment_status.as_str().to_string(),
        p.registered_at.format(DATE_FORMAT).to_string(),
        if p.attendance_confirmed { "Yes" } else { "No" }.to_string(),
    ]
}

fn encode_row(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::participant::fixtures::participant;
    use crate::domain::participant::{RevenueBracket, Sector, Tier};

    #[test]
    fn three_rows_with_embedded_comma() {
        let mut rows = vec![
            participant("Ana Souza", Tier::Free, 0),
            participant("Bruno Dias", Tier::Paid, 1),
            participant("Carla Reis", Tier::Paid, 2),
        ];
        if let Some(p) = rows.get_mut(1) {
            p.city = "Rio de Janeiro, Centro".to_string();
        }

        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(
            lines
                .get(2)
                .is_some_and(|l| l.contains(",\"Rio de Janeiro, Centro\","))
        );
    }

    #[test]
    fn header_is_fixed_and_quoted() {
        let csv = to_csv(std::iter::empty());
        assert_eq!(
            csv,
            "\"Name\",\"TaxId\",\"Email\",\"Phone\",\"Company\",\"RevenueBracket\",\"Sector\",\
             \"City\",\"State\",\"RegistrationTier\",\"PaymentStatus\",\"RegistrationDate\",\
             \"AttendanceConfirmed\""
        );
    }

    #[test]
    fn renders_labels_raw_digits_and_dates() {
        let mut p = participant("Dora", Tier::Paid, 0);
        p.company_name = Some("Acme \"Ltda\"".to_string());
        p.revenue_bracket = Some(RevenueBracket::From1mTo5m);
        p.sector = Some(Sector::Agribusiness);
        p.attendance_confirmed = true;

        let csv = to_csv([&p]);
        let Some(row) = csv.lines().nth(1) else {
            panic!("missing data row");
        };
        assert_eq!(
            row,
            "\"Dora\",\"52998224725\",\"dora@example.com\",\"11988887777\",\
             \"Acme \"\"Ltda\"\"\",\"R$ 1M - 5M\",\"Agribusiness\",\"Campinas\",\"SP\",\
             \"paid\",\"pending\",\"March 1, 2025 09:00:00 UTC\",\"Yes\""
        );
    }

    #[test]
    fn blank_optionals_render_empty() {
        let p = participant("Eva", Tier::Free, 0);
        let csv = to_csv([&p]);
        assert!(csv.contains("\"11988887777\",\"\",\"\",\"\",\"Campinas\""));
        assert!(csv.ends_with("\"No\""));
    }

    #[test]
    fn file_name_carries_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap_or_default();
        assert_eq!(file_name(date), "participants_event_2025-03-15.csv");
    }
}
