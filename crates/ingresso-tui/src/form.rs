//! Form focus model — fields, checkboxes, and the submit control.

use ingresso_core::{Field, Section};

/// Everything that can hold focus, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    /// One of the scalar text inputs.
    Input(Field),
    /// A checkbox, indexed into [`Section::CATALOG`].
    Section(usize),
    /// The submit control.
    Submit,
}

/// Tab order: five inputs, six checkboxes, the submit control.
pub const RING: [FormFocus; 12] = [
    FormFocus::Input(Field::EventUrl),
    FormFocus::Input(Field::Cpf),
    FormFocus::Input(Field::TicketCount),
    FormFocus::Input(Field::Username),
    FormFocus::Input(Field::Password),
    FormFocus::Section(0),
    FormFocus::Section(1),
    FormFocus::Section(2),
    FormFocus::Section(3),
    FormFocus::Section(4),
    FormFocus::Section(5),
    FormFocus::Submit,
];

impl FormFocus {
    fn position(self) -> usize {
        RING.iter().position(|&f| f == self).unwrap_or(0)
    }

    /// The next focus target, wrapping.
    pub fn next(self) -> Self {
        RING[(self.position() + 1) % RING.len()]
    }

    /// The previous focus target, wrapping.
    pub fn prev(self) -> Self {
        RING[(self.position() + RING.len() - 1) % RING.len()]
    }

    /// The catalog section under a checkbox focus, if any.
    pub fn section(self) -> Option<Section> {
        match self {
            Self::Section(index) => Section::CATALOG.get(index).copied(),
            _ => None,
        }
    }
}

/// Field label shown on the input border.
pub fn label(field: Field) -> &'static str {
    match field {
        Field::EventUrl => "Event URL",
        Field::Cpf => "CPF",
        Field::TicketCount => "Tickets",
        Field::Username => "Username (email)",
        Field::Password => "Password",
    }
}
