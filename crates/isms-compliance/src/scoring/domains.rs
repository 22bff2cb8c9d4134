//! ISO domains scored by the automated scorer

use isms_common::{IsmsError, IsmsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 14 fixed ISO-aligned domains, A.5 to A.18
///
/// Variant order is the canonical order used for every scoring result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IsoDomain {
    #[serde(rename = "A.5_Politiques")]
    Policies,
    #[serde(rename = "A.6_Organisation")]
    Organisation,
    #[serde(rename = "A.7_Ressources_humaines")]
    HumanResources,
    #[serde(rename = "A.8_Gestion_actifs")]
    AssetManagement,
    #[serde(rename = "A.9_Controle_acces")]
    AccessControl,
    #[serde(rename = "A.10_Cryptographie")]
    Cryptography,
    #[serde(rename = "A.11_Securite_physique")]
    PhysicalSecurity,
    #[serde(rename = "A.12_Securite_exploitation")]
    OperationsSecurity,
    #[serde(rename = "A.13_Securite_communications")]
    CommunicationsSecurity,
    #[serde(rename = "A.14_Developpement")]
    Development,
    #[serde(rename = "A.15_Relations_fournisseurs")]
    SupplierRelationships,
    #[serde(rename = "A.16_Gestion_incidents")]
    IncidentManagement,
    #[serde(rename = "A.17_Continuite_activite")]
    BusinessContinuity,
    #[serde(rename = "A.18_Conformite")]
    Compliance,
}

impl IsoDomain {
    pub const ALL: [IsoDomain; 14] = [
        Self::Policies,
        Self::Organisation,
        Self::HumanResources,
        Self::AssetManagement,
        Self::AccessControl,
        Self::Cryptography,
        Self::PhysicalSecurity,
        Self::OperationsSecurity,
        Self::CommunicationsSecurity,
        Self::Development,
        Self::SupplierRelationships,
        Self::IncidentManagement,
        Self::BusinessContinuity,
        Self::Compliance,
    ];

    /// Annex number, 5 to 18
    pub const fn number(&self) -> u8 {
        match self {
            Self::Policies => 5,
            Self::Organisation => 6,
            Self::HumanResources => 7,
            Self::AssetManagement => 8,
            Self::AccessControl => 9,
            Self::Cryptography => 10,
            Self::PhysicalSecurity => 11,
            Self::OperationsSecurity => 12,
            Self::CommunicationsSecurity => 13,
            Self::Development => 14,
            Self::SupplierRelationships => 15,
            Self::IncidentManagement => 16,
            Self::BusinessContinuity => 17,
            Self::Compliance => 18,
        }
    }

    /// Stable tag, e.g. `A.9_Controle_acces`
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Policies => "A.5_Politiques",
            Self::Organisation => "A.6_Organisation",
            Self::HumanResources => "A.7_Ressources_humaines",
            Self::AssetManagement => "A.8_Gestion_actifs",
            Self::AccessControl => "A.9_Controle_acces",
            Self::Cryptography => "A.10_Cryptographie",
            Self::PhysicalSecurity => "A.11_Securite_physique",
            Self::OperationsSecurity => "A.12_Securite_exploitation",
            Self::CommunicationsSecurity => "A.13_Securite_communications",
            Self::Development => "A.14_Developpement",
            Self::SupplierRelationships => "A.15_Relations_fournisseurs",
            Self::IncidentManagement => "A.16_Gestion_incidents",
            Self::BusinessContinuity => "A.17_Continuite_activite",
            Self::Compliance => "A.18_Conformite",
        }
    }

    /// Display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Policies => "Politiques de sécurité",
            Self::Organisation => "Organisation de la sécurité",
            Self::HumanResources => "Sécurité des ressources humaines",
            Self::AssetManagement => "Gestion des actifs",
            Self::AccessControl => "Contrôle d'accès",
            Self::Cryptography => "Cryptographie",
            Self::PhysicalSecurity => "Sécurité physique et environnementale",
            Self::OperationsSecurity => "Sécurité liée à l'exploitation",
            Self::CommunicationsSecurity => "Sécurité des communications",
            Self::Development => "Acquisition, développement et maintenance",
            Self::SupplierRelationships => "Relations avec les fournisseurs",
            Self::IncidentManagement => "Gestion des incidents",
            Self::BusinessContinuity => "Continuité d'activité",
            Self::Compliance => "Conformité",
        }
    }

    /// Accepts the stable tag or the short `A.N` form
    pub fn parse(value: &str) -> IsmsResult<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|domain| {
                domain.tag().eq_ignore_ascii_case(trimmed)
                    || format!("A.{}", domain.number()).eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| IsmsError::Config(format!("unknown ISO domain: {}", value)))
    }
}

impl FromStr for IsoDomain {
    type Err = IsmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IsoDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A.{} {}", self.number(), self.label())
    }
}
