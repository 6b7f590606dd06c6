// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case types and the document checklist they seed.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Document that every checklist begins with.
pub const ENDORSEMENT_LETTER: &str = "Endorsement Letter";

/// Land and property transaction types handled by the office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    LandFirstTime,
    BuildingImprovements,
    SubdivisionConsolidation,
    ReassessmentReclassification,
    AreaIncreaseDecrease,
    TransferOwnershipTaxDecl,
}

impl CaseType {
    pub const ALL: [Self; 6] = [
        Self::LandFirstTime,
        Self::BuildingImprovements,
        Self::SubdivisionConsolidation,
        Self::ReassessmentReclassification,
        Self::AreaIncreaseDecrease,
        Self::TransferOwnershipTaxDecl,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LandFirstTime => "land_first_time",
            Self::BuildingImprovements => "building_improvements",
            Self::SubdivisionConsolidation => "subdivision_consolidation",
            Self::ReassessmentReclassification => "reassessment_reclassification",
            Self::AreaIncreaseDecrease => "area_increase_decrease",
            Self::TransferOwnershipTaxDecl => "transfer_ownership_tax_decl",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LandFirstTime => "Land declared for the first-time",
            Self::BuildingImprovements => "Building and other improvements / Machineries",
            Self::SubdivisionConsolidation => "Subdivision or Consolidation",
            Self::ReassessmentReclassification => "Re-assessment / Re-classification",
            Self::AreaIncreaseDecrease => "Increase / Decrease of Area",
            Self::TransferOwnershipTaxDecl => "Transfer of Ownership of Tax Declaration",
        }
    }

    /// Returns the documents normally required for this case type.
    #[must_use]
    pub const fn requirements(&self) -> &'static [&'static str] {
        match self {
            Self::LandFirstTime => &[
                "Letter-request (Municipal/Provincial Assessor)",
                "Technical Description / Sketch Plan (GE) and DENR-approved Survey Plan",
                "CENRO Certification (alienable and disposable area)",
                "Affidavit of Ownership (long, continuous possession)",
                "Barangay Captain Certification (possession/occupancy, no controversy)",
                "Affidavit of adjoining owners",
                "Ocular inspection/investigation report (Assessor/Staff)",
            ],
            Self::BuildingImprovements => &[
                "Letter-request (Municipal/Provincial Assessor)",
                "Approved building permit + building plan / Certificate of Completion / Occupancy permit",
                "Affidavit of Ownership / Sworn Statement of Market Value (if no building permit)",
                "Affidavit of Consent from land owner (if land owned by another)",
                "Inspection report / FAAS of building/structure (Assessor/Staff)",
                "Registration from Municipal Engineer (machineries)",
            ],
            Self::SubdivisionConsolidation => &[
                "Letter request (subdivision/consolidation)",
                "Inspection report + endorsement (Assessor/Staff)",
                "Approved subdivision / survey plan",
                "Tax Clearance (current)",
            ],
            Self::ReassessmentReclassification => &[
                "Letter request (re-assessment/re-classification)",
                "Inspection report + endorsement (Assessor/Staff)",
                "DAR Clearance / MARO Certification (as applicable)",
                "Tax Clearance (current)",
                "Tax Declaration (photocopy)",
            ],
            Self::AreaIncreaseDecrease => &[
                "Letter request (correction of area)",
                "Inspection report + endorsement (Assessor/Staff)",
                "Approved Survey Plan / Technical Description",
                "Affidavit of adjoining owners (if increase)",
                "Tax Clearance (current)",
                "DENR Certification (alienable and disposable area)",
            ],
            Self::TransferOwnershipTaxDecl => &[
                "Letter request (transfer of ownership of tax declaration)",
                "Endorsement from Municipal Assessor",
                "Deed of Conveyance (Registry of Deeds)",
                "Tax Clearance (current)",
                "Certificate Authorizing Registration (CAR)",
                "Subdivision / Consolidation Plan",
                "Transfer Tax / Transfer Fee Receipt",
                "Certified true copy / machine copy of title (if titled)",
            ],
        }
    }
}

impl FromStr for CaseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidCaseType(s.to_string()))
    }
}

/// One row of a case's document checklist.
///
/// Informational only; no transition is gated on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub document_type: String,
    pub uploaded: bool,
}

impl ChecklistItem {
    #[must_use]
    pub fn new(document_type: &str, uploaded: bool) -> Self {
        Self {
            document_type: document_type.to_string(),
            uploaded,
        }
    }
}

/// Builds the initial checklist for a new draft.
///
/// The endorsement letter comes first, followed by the case type's
/// requirements. Blank entries are skipped and duplicates are removed
/// case-insensitively, keeping the first spelling.
#[must_use]
pub fn seed_checklist(case_type: Option<CaseType>) -> Vec<ChecklistItem> {
    let requirements = case_type.map_or(&[][..], |t| t.requirements());
    let mut seen: HashSet<String> = HashSet::new();

    std::iter::once(ENDORSEMENT_LETTER)
        .chain(requirements.iter().copied())
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .filter(|doc| seen.insert(doc.to_lowercase()))
        .map(|doc| ChecklistItem::new(doc, false))
        .collect()
}

/// Marks a document type as uploaded and returns the checklist's spelling
/// of it.
///
/// Matching is case-insensitive. A document type not yet on the list is
/// inserted at the front.
pub fn mark_uploaded(checklist: &mut Vec<ChecklistItem>, document_type: &str) -> String {
    let wanted = document_type.trim().to_lowercase();
    if let Some(item) = checklist
        .iter_mut()
        .find(|item| item.document_type.to_lowercase() == wanted)
    {
        item.uploaded = true;
        return item.document_type.clone();
    }
    let item = ChecklistItem::new(document_type.trim(), true);
    let spelling = item.document_type.clone();
    checklist.insert(0, item);
    spelling
}
