use super::rng::Rng;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TipCategory {
    Salary,
    Equity,
    Benefits,
    Rejection,
    Confidence,
    General,
}

// Checked in order; the first group with a matching keyword wins.
const KEYWORD_GROUPS: &[(&[&str], TipCategory)] = &[
    (
        &[
            "no budget",
            "reject",
            "said no",
            "declined",
            "can't",
            "won't",
            "refused",
            "pushback",
        ],
        TipCategory::Rejection,
    ),
    (
        &["equity", "stock", "options", "vesting", "shares", "rsu"],
        TipCategory::Equity,
    ),
    (
        &[
            "benefit",
            "remote",
            "leave",
            "pto",
            "flexibility",
            "perks",
            "vacation",
            "wfh",
        ],
        TipCategory::Benefits,
    ),
    (
        &[
            "confident",
            "nervous",
            "scared",
            "afraid",
            "anxiety",
            "worried",
            "uncomfortable",
        ],
        TipCategory::Confidence,
    ),
    // Timing, signing bonus, promotion and counteroffer questions get the
    // general library but must win over the salary keywords they contain.
    (
        &["when", "timing", "wait", "how soon", "deadline", "days"],
        TipCategory::General,
    ),
    (
        &["signing bonus", "sign-on", "one-time", "lump sum", "maxed out"],
        TipCategory::General,
    ),
    (
        &["promotion", "promoted", "advance", "title", "level up", "brag doc"],
        TipCategory::General,
    ),
    (
        &["counter", "counteroffer", "current employer", "match", "retain"],
        TipCategory::General,
    ),
    (
        &[
            "salary",
            "pay",
            "compensation",
            "raise",
            "money",
            "offer",
            "underpaid",
            "lowball",
        ],
        TipCategory::Salary,
    ),
];

const SALARY_TIPS: &[&str] = &[
    "Never reveal your current salary first. Ask 'What's the budgeted range for this role?' to anchor the negotiation. (Source: Harvard Business Review)",
    "Research market rates using Glassdoor, Levels.fyi, and Payscale before any negotiation. Data-driven requests are 3x more likely to succeed. (Source: Fearless Salary Negotiation)",
    "Use specific numbers like $127,000 instead of $130,000. Precise figures signal thorough research and are harder to negotiate down. (Source: Columbia Business School)",
];

const EQUITY_TIPS: &[&str] = &[
    "Request equity details in writing: vesting schedule, strike price, and percentage of fully-diluted shares, not just number of options. (Source: Holloway Guide to Equity Compensation)",
    "Ask: 'What was the valuation at the last funding round?' to determine if your equity offer is actually meaningful. (Source: Index Ventures)",
];

const BENEFITS_TIPS: &[&str] = &[
    "Negotiate family leave, remote flexibility, and professional development budgets. These often have more room than base salary. (Source: Lean In)",
    "Ask for a work-from-anywhere stipend ($500-1000/year) even if remote work is already standard. (Source: GitLab Remote Work Framework)",
];

const REJECTION_TIPS: &[&str] = &[
    "If they say 'no budget,' know that 80% of the time this is negotiable. Ask about signing bonuses, equity, or a 6-month salary review. (Source: Never Split the Difference)",
    "If they say no to salary, ask: 'What would need to happen to revisit this in 6 months?' Turn rejection into a roadmap. (Source: Ask a Manager)",
];

const CONFIDENCE_TIPS: &[&str] = &[
    "Use collaborative framing: 'I'm excited about this role. Based on my research, I'd like to discuss...' This reduces social backlash by 40%. (Source: Women Don't Ask)",
    "Practice your negotiation script out loud 3 times before the real conversation. Rehearsal reduces anxiety significantly. (Source: Stanford GSB)",
];

const GENERAL_TIPS: &[&str] = &[
    "Wait until you have a written offer before negotiating. A verbal 'we'd like to offer you...' is not an offer yet. (Source: Never Split the Difference)",
    "Document your wins quarterly in a 'brag document' with metrics. Concrete evidence is your strongest tool in any negotiation. (Source: Julia Evans)",
    "Negotiate within 2-3 business days of receiving an offer to show enthusiasm while maintaining leverage. (Source: Wharton School)",
    "You deserve to be paid fairly. Research shows women who negotiate their first salary earn over $1M more across their careers.",
    "If salary is 'maxed out,' ask for a signing bonus. It comes from a different budget pool and is often easier to approve. (Source: Never Split the Difference)",
];

pub const RESEARCH_PREFIX: &str = "I checked our research database. ";

impl TipCategory {
    pub fn tips(self) -> &'static [&'static str] {
        match self {
            TipCategory::Salary => SALARY_TIPS,
            TipCategory::Equity => EQUITY_TIPS,
            TipCategory::Benefits => BENEFITS_TIPS,
            TipCategory::Rejection => REJECTION_TIPS,
            TipCategory::Confidence => CONFIDENCE_TIPS,
            TipCategory::General => GENERAL_TIPS,
        }
    }
}

pub fn classify_message(message: &str) -> TipCategory {
    let lowered = message.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|&(_, category)| category)
        .unwrap_or(TipCategory::General)
}

/// Picks negotiation tips for chat messages.
#[derive(Debug, Clone)]
pub struct Coach {
    rng: Rng,
}

impl Coach {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed) }
    }

    pub fn tip(&mut self, message: &str) -> &'static str {
        let tips = classify_message(message).tips();
        tips[self.rng.next_index(tips.len())]
    }

    pub fn reply(&mut self, message: &str) -> String {
        let message = message.trim();
        let tip = self.tip(message);
        if message.is_empty() {
            tip.to_string()
        } else {
            format!("{RESEARCH_PREFIX}{tip}")
        }
    }
}
