// ==========================================
// Proposal Desk - domain enums
// ==========================================
// Responsibility: closed value sets shared by proposals, users and imports
// Storage: serialized with the display values the commercial team uses
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ProposalStatus - commercial funnel stage
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[serde(rename = "Primeira proposta")]
    PrimeiraProposta,
    #[serde(rename = "Pendente")]
    Pendente,
    #[serde(rename = "Em Andamento")]
    EmAndamento,
    #[serde(rename = "Negativa")]
    Negativa,
    #[serde(rename = "Concluída")]
    Concluida,
}

impl ProposalStatus {
    /// All statuses in funnel order
    pub const ALL: [ProposalStatus; 5] = [
        ProposalStatus::PrimeiraProposta,
        ProposalStatus::Pendente,
        ProposalStatus::EmAndamento,
        ProposalStatus::Negativa,
        ProposalStatus::Concluida,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::PrimeiraProposta => "Primeira proposta",
            ProposalStatus::Pendente => "Pendente",
            ProposalStatus::EmAndamento => "Em Andamento",
            ProposalStatus::Negativa => "Negativa",
            ProposalStatus::Concluida => "Concluída",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ProposalType / ProposalModality
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalType {
    Company,
    Individual,
    #[serde(rename = "Patrocínio")]
    Patrocinio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalModality {
    Individual,
    Pacote,
}

// ==========================================
// ReservationStatus - whether slots are held
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Sim,
    #[serde(rename = "Não")]
    Nao,
    Parcial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Boleto,
    Pix,
    #[serde(rename = "Cartão")]
    Cartao,
    Faturado,
    Parcelado,
}

/// Kit pickup mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalType {
    Individual,
    Grupo,
}

// ==========================================
// UserRole
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Exec,
    Viewer,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

// ==========================================
// ActionType - audit trail verbs
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Criou,
    Editou,
    Excluiu,
    Duplicou,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_display_value() {
        let json = serde_json::to_string(&ProposalStatus::Concluida).unwrap();
        assert_eq!(json, "\"Concluída\"");

        let back: ProposalStatus = serde_json::from_str("\"Primeira proposta\"").unwrap();
        assert_eq!(back, ProposalStatus::PrimeiraProposta);
    }

    #[test]
    fn test_role_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Exec).unwrap(), "\"exec\"");
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Viewer.is_admin());
    }

    #[test]
    fn test_reservation_accent() {
        assert_eq!(
            serde_json::to_string(&ReservationStatus::Nao).unwrap(),
            "\"Não\""
        );
    }
}
