//! Built-in rosters and scenario prompts.

use crate::providers::ProviderKind;
use crate::roster::{DebateOverrides, ResponderSpec, Roster};

/// Canned tax scenarios for the `scenarios` command.
pub const TAX_SCENARIOS: [&str; 3] = [
    "A freelance software developer earned $120,000 in 2023, has $15,000 in business expenses, \
     contributes $6,000 to an IRA, and is considering whether to elect S-Corp status. \
     What's the optimal tax strategy?",
    "A married couple filing jointly has $180,000 combined income, $25,000 in mortgage interest, \
     $12,000 in state taxes, two children, and $8,000 in childcare expenses. \
     Should they itemize or take the standard deduction?",
    "A small business owner sold their company for $2.5M after owning it for 6 years. \
     They want to minimize capital gains tax. What are their options for tax optimization?",
];

const TAX_EXPERT_PROMPT: &str = "You are a tax law expert specializing in complex tax \
     calculations and regulations. Your role is to provide accurate, legally sound tax advice \
     based on current tax codes. Focus on technical accuracy and cite relevant tax codes when \
     applicable. Always consider edge cases and potential complications.";

const ACCOUNTING_PRO_PROMPT: &str = "You are a CPA with extensive experience in tax preparation \
     and financial planning. Your role is to provide practical, client-focused tax advice that \
     balances compliance with optimization. Consider the broader financial implications of tax \
     decisions. Focus on actionable recommendations and risk management.";

const FINANCIAL_ADVISOR_PROMPT: &str = "You are a financial advisor who specializes in \
     tax-efficient financial planning. Your role is to consider the long-term financial impact \
     of tax decisions. Focus on strategic planning, investment implications, and holistic \
     financial health. Always consider how tax decisions fit into broader financial goals.";

const FILE_ASSISTANT_PROMPT: &str = "You are an AI assistant helping the user find information \
in their own documents and files.

When the user asks a question, you MUST:
1. Use [CAPABILITY_CALL: list_local_files] [/CAPABILITY_CALL] to see which files are available
2. Identify which files might contain information relevant to the question
3. Use [CAPABILITY_CALL: read_local_file] filename [/CAPABILITY_CALL] to read those files
4. Analyze the content the tools return
5. Answer with the exact information found in the files

The tools work and return results. Do not claim you cannot access files when tools are available.

Never provide placeholder or made-up information, and never assume information that is not \
present in the files. If the answer is not in the available files, say so clearly.";

fn spec(name: &str, role: &str, provider: ProviderKind, prompt: &str) -> ResponderSpec {
    ResponderSpec {
        name: name.to_string(),
        role: role.to_string(),
        provider,
        model: None,
        system_prompt: prompt.to_string(),
        tools: None,
    }
}

/// Three capability-free tax personas on one provider.
pub fn tax_panel(provider: ProviderKind) -> Roster {
    Roster {
        debate: DebateOverrides::default(),
        responders: vec![
            spec("TaxExpert", "Tax Law Specialist", provider, TAX_EXPERT_PROMPT),
            spec(
                "AccountingPro",
                "Certified Public Accountant",
                provider,
                ACCOUNTING_PRO_PROMPT,
            ),
            spec(
                "FinancialAdvisor",
                "Financial Planning Specialist",
                provider,
                FINANCIAL_ADVISOR_PROMPT,
            ),
        ],
    }
}

/// A single assistant bound to every registered tool.
pub fn file_assistant(provider: ProviderKind) -> Roster {
    let mut assistant = spec("Assistant", "AI assistant", provider, FILE_ASSISTANT_PROMPT);
    assistant.tools = Some(Vec::new());
    Roster {
        debate: DebateOverrides::default(),
        responders: vec![assistant],
    }
}
