//! Static keyword dictionaries (spec §4.3). All lookups case-fold the
//! input; the dictionaries themselves are lowercase already.

use shared_types::FieldType;

/// Confidence assigned to a `Candidate` a strategy builds without an
/// explicit override — mirrors the Python original's dataclass defaults.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const SIGNATURE_KEYWORDS: &[&str] = &[
    "signature",
    "sign here",
    "authorized signature",
    "client signature",
    "employee signature",
    "contractor signature",
    "landlord signature",
    "tenant signature",
    "buyer signature",
    "seller signature",
    "witness signature",
];

pub const DATE_KEYWORDS: &[&str] = &[
    "date",
    "dated",
    "date signed",
    "effective date",
    "start date",
    "end date",
    "as of",
];

pub const NAME_KEYWORDS: &[&str] = &[
    "name",
    "print name",
    "printed name",
    "full name",
    "client name",
    "employee name",
    "contractor name",
    "landlord",
    "tenant",
    "buyer",
    "seller",
];

pub const EMAIL_KEYWORDS: &[&str] = &["email", "e-mail", "email address"];

pub const INITIALS_KEYWORDS: &[&str] = &["initials", "initial here", "initial"];

/// Role inference phrases, in the order they're checked — the first
/// matching phrase wins, so order is part of the contract (spec §4.12).
pub const ROLE_KEYWORDS: &[(&str, &[&str])] = &[
    ("client", &["client", "customer", "buyer", "purchaser", "party a", "first party"]),
    ("contractor", &["contractor", "consultant", "freelancer", "vendor"]),
    ("employee", &["employee", "worker", "staff", "team member"]),
    ("company", &["company", "employer", "corporation", "business", "party b", "second party"]),
    ("landlord", &["landlord", "lessor", "property owner", "owner"]),
    ("tenant", &["tenant", "renter", "lessee", "occupant"]),
    ("seller", &["seller", "vendor"]),
    ("borrower", &["borrower", "debtor"]),
    ("lender", &["lender", "creditor", "bank"]),
    ("witness", &["witness"]),
    ("guarantor", &["guarantor", "co-signer", "cosigner"]),
];

/// Default role key and confidence when no `ROLE_KEYWORDS` phrase matches.
pub const DEFAULT_ROLE_KEY: &str = "signer";
pub const DEFAULT_ROLE_CONFIDENCE: f64 = 0.3;
pub const ROLE_MATCH_CONFIDENCE: f64 = 0.7;

/// Map an anchor-tag type code (`sig`, `date`, ...) to its `FieldType`,
/// defaulting to `Text` for an unrecognized code (spec §4.3, §4.7).
pub fn anchor_type_from_code(code: &str) -> FieldType {
    match code {
        "sig" | "signature" => FieldType::Signature,
        "init" | "initials" => FieldType::Initials,
        "date" => FieldType::DateSigned,
        "name" => FieldType::Name,
        "email" => FieldType::Email,
        "check" | "checkbox" => FieldType::Checkbox,
        "text" => FieldType::Text,
        _ => FieldType::Text,
    }
}
