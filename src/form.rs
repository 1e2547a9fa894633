use serde::{Deserialize, Serialize};

use crate::calculator::{self, CalculatorError, CalculatorInput};

/// A form submitted from the landing page
///
/// Transient: it is formatted into a chat message and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(flatten)]
    pub kind: FormKind,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Form purpose, tagged by `formType`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "formType", rename_all = "lowercase")]
pub enum FormKind {
    /// "Calculate the renovation cost"
    Estimate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        area: Option<String>,
    },
    /// "Call an engineer to the site"
    Engineer,
    /// Quote ordered from the calculator
    Calculator {
        #[serde(
            default,
            rename = "calculatorData",
            skip_serializing_if = "Option::is_none"
        )]
        calculator_data: Option<CalculatorSnapshot>,
    },
    /// Generic feedback form
    Contact,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Estimate { .. } => "estimate",
            Self::Engineer => "engineer",
            Self::Calculator { .. } => "calculator",
            Self::Contact => "contact",
        }
    }
}

/// Calculator inputs and derived totals at the moment the quote was ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    pub area: u32,
    pub is_new_build: bool,
    pub has_design_project: bool,
    pub needs_demolition: bool,
    pub total_work: u64,
    pub total_materials: u64,
    pub total_design: u64,
    pub total: u64,
}

impl CalculatorSnapshot {
    pub fn from_input(input: &CalculatorInput) -> Result<Self, CalculatorError> {
        let estimate = calculator::estimate(input)?;
        let input = input.normalized();
        Ok(Self {
            area: input.area,
            is_new_build: input.is_new_build,
            has_design_project: input.has_design_project,
            needs_demolition: input.needs_demolition,
            total_work: estimate.work,
            total_materials: estimate.materials,
            total_design: estimate.design,
            total: estimate.total,
        })
    }
}

impl FormSubmission {
    pub fn contact(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            kind: FormKind::Contact,
            name: name.into(),
            phone: phone.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Calculator snapshot, if this is a calculator quote that carries one
    pub fn calculator_data(&self) -> Option<&CalculatorSnapshot> {
        match &self.kind {
            FormKind::Calculator { calculator_data } => calculator_data.as_ref(),
            _ => None,
        }
    }
}
