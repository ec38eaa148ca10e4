// src/classify/keywords.rs
//
// Built-in keyword tables. Each table is ordered: classification walks it top
// to bottom and stops at the first entry with a matching keyword.

pub const OTHER_ROLE: &str = "Other / Unclassified";
pub const OTHER_INDUSTRY: &str = "Other";

pub const ROLE_CLUSTERS: &[(&str, &[&str])] = &[
    (
        "Founders & CEOs",
        &[
            "founder", "co-founder", "cofounder", "ceo", "chief executive", "owner",
            "principal", "managing partner", "entrepreneur",
        ],
    ),
    (
        "Tech & Engineering",
        &[
            "engineer", "developer", "software", "swe", "devops", "sre", "architect", "cto",
            "tech lead", "data scientist", "ml ", "machine learning", "full stack",
            "fullstack", "frontend", "backend", "platform", "infrastructure",
            "security engineer",
        ],
    ),
    (
        "Sales & BD",
        &[
            "sales", "account executive", "business development", "bdr", "sdr", "revenue",
            "partnerships", "ae ", "account manager",
        ],
    ),
    (
        "Marketing & Growth",
        &[
            "marketing", "brand", "content", "growth", "demand gen", "cmo", "communications",
            "social media", "digital marketing", "email marketing", "lifecycle", "crm",
            "retention", "acquisition", "performance marketing", "product marketing", "pmm",
        ],
    ),
    (
        "Product",
        &[
            "product manager", "product lead", "product director", "vp product",
            "head of product", "cpo", "product design", "ux", "ui/ux",
        ],
    ),
    (
        "Design & Creative",
        &[
            "designer", "design lead", "creative director", "art director", "visual design",
            "graphic design", "ux design", "ui design",
        ],
    ),
    (
        "Recruiting & HR",
        &[
            "recruiter", "talent", "recruiting", "people ops", "hr ", "human resources",
            "head of people", "vp people",
        ],
    ),
    (
        "Consulting & Strategy",
        &[
            "consultant", "advisor", "advisory", "freelance", "independent", "strategist",
            "strategy",
        ],
    ),
    (
        "Executive Leadership",
        &[
            "vp ", "vice president", "svp", "evp", "director", "head of", "chief", "c-suite",
            "coo", "cfo", "cro", "cmo",
        ],
    ),
    (
        "Operations",
        &[
            "operations", "ops ", "supply chain", "logistics", "fulfillment", "procurement",
            "project manager", "program manager",
        ],
    ),
];

pub const INDUSTRIES: &[(&str, &[&str])] = &[
    (
        "DTC / E-commerce",
        &[
            "beauty", "skin", "cosmetic", "fashion", "apparel", "clothing", "home", "decor",
            "food", "beverage", "wellness", "supplement", "jewelry", "accessories",
            "lifestyle", "retail", "shop", "store", "brand", "direct", "dtc", "d2c",
            "ecommerce", "e-commerce", "consumer", "subscription box",
        ],
    ),
    (
        "Martech / SaaS",
        &[
            "klaviyo", "braze", "shopify", "attentive", "yotpo", "gorgias", "iterable",
            "sailthru", "segment", "amplitude", "mixpanel", "hubspot", "marketo",
            "salesforce", "platform", "saas", "software", "analytics", "data", "automation",
            "crm", "martech", "adtech",
        ],
    ),
    (
        "Tech",
        &[
            "tech", "technology", "ai ", "artificial intelligence", "machine learning",
            "cloud", "cyber", "fintech", "biotech", "healthtech", "edtech", "proptech",
            "crypto", "blockchain", "computing", "digital",
        ],
    ),
    (
        "Recruiting / Staffing",
        &[
            "recruiting", "staffing", "talent", "hiring", "recruitment", "headhunt", "career",
            "job", "workforce",
        ],
    ),
    (
        "Luxury / Premium",
        &[
            "luxury", "premium", "high-end", "designer", "couture", "prestige", "artisan",
            "bespoke",
        ],
    ),
    (
        "Media / Publishing",
        &[
            "media", "publish", "news", "content", "editorial", "journalism", "entertainment",
            "podcast", "video",
        ],
    ),
    (
        "Agency / Services",
        &[
            "agency", "consulting", "consultancy", "service", "studio", "creative agency",
            "digital agency", "marketing agency",
        ],
    ),
    (
        "Finance / VC",
        &[
            "venture", "capital", "investment", "fund", "finance", "banking",
            "private equity", "pe ", "vc ", "angel",
        ],
    ),
];

pub const SPAM_INDICATORS: &[&str] = &[
    "i noticed your profile",
    "i came across your profile",
    "i saw your profile",
    "limited time",
    "exclusive opportunity",
    "are you open to",
    "we're hiring",
    "we are hiring",
    "job opportunity",
    "perfect fit",
    "reaching out because",
    "thought you'd be interested",
    "hope this finds you well",
    "i'd love to connect",
    "open to exploring",
    "exciting opportunity",
    "top talent",
    "passive candidate",
    "impressive background",
    "quick question",
    "just following up",
    "checking in",
    "i help companies",
    "i help professionals",
    "revenue growth",
    "book a call",
    "schedule a chat",
    "free consultation",
    "free trial",
    "demo",
    "webinar",
    "download our",
    "unsubscribe",
    "opt out",
];

/// Position words that mark a sender as senior when ranking messages.
pub const SENIOR_TITLES: &[&str] = &[
    "vp", "vice president", "director", "head of", "chief", "founder", "ceo", "cto", "cmo",
    "coo", "partner", "principal", "svp", "evp",
];

/// Words that suggest a message asks for something.
pub const ACTIONABLE_WORDS: &[&str] = &[
    "meet", "coffee", "call", "chat", "discuss", "collaborate", "advice", "introduce",
    "referral", "recommend", "opportunity", "project", "role", "position", "offer",
    "proposal",
];
