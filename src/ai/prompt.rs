//! Prompt generation for the proposal audit
//!
//! Proposals are reduced to a compact JSON summary before being sent.

use crate::domain::proposal::Proposal;
use chrono::NaiveDate;
use serde::Serialize;

/// What the model sees of each proposal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDigest {
    pub id: String,
    pub status: String,
    pub return_date: NaiveDate,
    pub value: f64,
    pub company: String,
}

impl From<&Proposal> for ProposalDigest {
    fn from(p: &Proposal) -> Self {
        Self {
            id: p.id.clone(),
            status: p.status.to_string(),
            return_date: p.return_date,
            value: p.total_value(),
            company: p.company.clone(),
        }
    }
}

pub fn digest<'a, I>(proposals: I) -> Vec<ProposalDigest>
where
    I: IntoIterator<Item = &'a Proposal>,
{
    proposals.into_iter().map(ProposalDigest::from).collect()
}

/// Build the audit prompt (Brazilian Portuguese, at most four paragraphs)
pub fn audit_prompt(digests: &[ProposalDigest], today: NaiveDate) -> String {
    let data = serde_json::to_string_pretty(digests).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Analise a seguinte lista de propostas comerciais B2B e forneça um breve relatório de "Auditoria Inteligente" (máximo 4 parágrafos).
Foque em:
1. Propostas com data de retorno expirada (hoje é {today}).
2. Concentração de valor no funil (qual status tem mais dinheiro parado).
3. Sugestões rápidas de priorização de follow-up.
Seja profissional e direto em português brasileiro.

Dados:
{data}
"#,
        today = today.format("%Y-%m-%d"),
        data = data
    )
}
