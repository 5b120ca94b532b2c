//! Form-state controller for a booking.

use std::collections::BTreeSet;

use secrecy::{ExposeSecret, SecretString};

use ingresso_api::BookingRequest;

use crate::section::Section;

/// A scalar form field, keyed the way the form updates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    EventUrl,
    Cpf,
    TicketCount,
    Username,
    Password,
}

/// The user-entered booking parameters, mutated field-by-field.
///
/// Deliberately validation-free: every setter succeeds. Required-ness is
/// a form affordance, not a property enforced here. The draft lives for
/// one session, is copied into a wire payload on submit, and is never
/// persisted.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub event_url: String,
    pub cpf: String,
    /// At least 1; see [`set_field`](Self::set_field).
    pub ticket_count: u32,
    pub username: String,
    /// Wrapped in memory so it never leaks into logs; the wire payload
    /// still carries it in cleartext.
    pub password: SecretString,
    pub excluded_sections: BTreeSet<Section>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            event_url: String::new(),
            cpf: String::new(),
            ticket_count: 1,
            username: String::new(),
            password: SecretString::from(String::new()),
            excluded_sections: BTreeSet::new(),
        }
    }
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one scalar field. Never fails; the ticket count falls
    /// back to the minimum of 1 when the raw input does not parse.
    pub fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::EventUrl => self.event_url = value.to_string(),
            Field::Cpf => self.cpf = value.to_string(),
            Field::TicketCount => {
                self.ticket_count = value.trim().parse().unwrap_or(1).max(1);
            }
            Field::Username => self.username = value.to_string(),
            Field::Password => self.password = SecretString::from(value.to_string()),
        }
    }

    /// Include or remove a section in the excluded set.
    ///
    /// Idempotent under repeated identical calls; membership is keyed by
    /// the section itself, so duplicates are impossible.
    pub fn toggle_section(&mut self, section: Section, included: bool) {
        if included {
            self.excluded_sections.insert(section);
        } else {
            self.excluded_sections.remove(&section);
        }
    }

    /// Copy the draft into the wire payload.
    pub fn to_request(&self) -> BookingRequest {
        BookingRequest {
            url: self.event_url.clone(),
            cpf: self.cpf.clone(),
            number_of_tickets: self.ticket_count,
            username: self.username.clone(),
            password: self.password.expose_secret().to_string(),
            sections_without_discount: self
                .excluded_sections
                .iter()
                .map(|section| section.name().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn toggle_is_idempotent() {
        let mut draft = BookingDraft::new();

        draft.toggle_section(Section::ArquibancadaNorte, true);
        draft.toggle_section(Section::ArquibancadaNorte, true);
        assert_eq!(draft.excluded_sections.len(), 1);

        draft.toggle_section(Section::ArquibancadaNorte, false);
        draft.toggle_section(Section::ArquibancadaNorte, false);
        assert!(draft.excluded_sections.is_empty());
    }

    #[test]
    fn last_toggle_wins() {
        let mut draft = BookingDraft::new();

        // Arbitrary interleaving — the set must equal the sections whose
        // last toggle was `included = true`.
        draft.toggle_section(Section::ArquibancadaNorte, true);
        draft.toggle_section(Section::CadeiraSuperiorSul, true);
        draft.toggle_section(Section::ArquibancadaNorte, false);
        draft.toggle_section(Section::CamaroteCorporativo, true);
        draft.toggle_section(Section::CadeiraSuperiorSul, false);
        draft.toggle_section(Section::CadeiraSuperiorSul, true);

        let expected: BTreeSet<Section> =
            [Section::CadeiraSuperiorSul, Section::CamaroteCorporativo]
                .into_iter()
                .collect();
        assert_eq!(draft.excluded_sections, expected);
    }

    #[test]
    fn set_field_overwrites_scalars() {
        let mut draft = BookingDraft::new();

        draft.set_field(Field::EventUrl, "https://tickets.example/event");
        draft.set_field(Field::Cpf, "123.456.789-00");
        draft.set_field(Field::Username, "fan@example.com");
        draft.set_field(Field::Username, "other@example.com");

        assert_eq!(draft.event_url, "https://tickets.example/event");
        assert_eq!(draft.cpf, "123.456.789-00");
        assert_eq!(draft.username, "other@example.com");
    }

    #[test]
    fn ticket_count_parses_and_clamps() {
        let mut draft = BookingDraft::new();
        assert_eq!(draft.ticket_count, 1);

        draft.set_field(Field::TicketCount, "4");
        assert_eq!(draft.ticket_count, 4);

        draft.set_field(Field::TicketCount, "0");
        assert_eq!(draft.ticket_count, 1);

        draft.set_field(Field::TicketCount, "not a number");
        assert_eq!(draft.ticket_count, 1);
    }

    #[test]
    fn to_request_copies_the_draft() {
        // Scenario: three tickets, two sections toggled on then one off —
        // the payload must carry exactly one excluded section.
        let mut draft = BookingDraft::new();
        draft.set_field(Field::EventUrl, "https://tickets.example/event");
        draft.set_field(Field::Cpf, "123.456.789-00");
        draft.set_field(Field::TicketCount, "3");
        draft.set_field(Field::Username, "fan@example.com");
        draft.set_field(Field::Password, "hunter2");
        draft.toggle_section(Section::ArquibancadaNorte, true);
        draft.toggle_section(Section::CamaroteCorporativo, true);
        draft.toggle_section(Section::ArquibancadaNorte, false);

        let request = draft.to_request();

        assert_eq!(request.url, "https://tickets.example/event");
        assert_eq!(request.number_of_tickets, 3);
        assert_eq!(request.password, "hunter2");
        assert_eq!(
            request.sections_without_discount,
            vec!["CAMAROTE CORPORATIVO SPFC".to_string()]
        );
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let mut draft = BookingDraft::new();
        draft.set_field(Field::Password, "hunter2");

        let rendered = format!("{draft:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
