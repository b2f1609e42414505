// Built-in scam taxonomy tables.
//
// Ten parent categories, each with ten child labels, plus canned summaries
// for the most frequently reported child labels. Order matters only for
// display; classification always considers the full candidate set.

pub(super) const PARENT_CATEGORIES: [&str; 10] = [
    "identity and account scams",
    "financial and payment scams",
    "commerce and delivery scams",
    "employment and education scams",
    "lottery prize and reward scams",
    "investment and trading scams",
    "romance and social scams",
    "tech support and service scams",
    "online content and social media scams",
    "banking and institutional scams",
];

pub(super) const CHILD_LABELS: [(&str, [&str; 10]); 10] = [
    (
        "identity and account scams",
        [
            "KYC update scam",
            "Aadhaar/PAN verification scam",
            "bank account suspension scam",
            "credit card block scam",
            "SIM swap scam",
            "OTP phishing scam",
            "account recovery scam",
            "fake 2FA verification scam",
            "identity theft scam",
            "fake government ID renewal scam",
        ],
    ),
    (
        "financial and payment scams",
        [
            "UPI fraud",
            "ATM card skimming scam",
            "loan approval scam",
            "fake EMI relief scam",
            "credit score improvement scam",
            "debt settlement scam",
            "fake insurance claim scam",
            "pension withdrawal scam",
            "fake subsidy scheme scam",
            "tax refund scam",
        ],
    ),
    (
        "commerce and delivery scams",
        [
            "fake courier delivery scam",
            "parcel held at customs scam",
            "e-commerce refund scam",
            "fake product listing scam",
            "online marketplace overpayment scam",
            "return replacement fraud",
            "fake warranty scam",
            "subscription renewal scam",
            "fake invoice scam",
            "QR code payment scam",
        ],
    ),
    (
        "employment and education scams",
        [
            "fake job offer scam",
            "work-from-home scam",
            "data entry scam",
            "online tutoring scam",
            "internship scam",
            "fake recruitment agency scam",
            "training fee scam",
            "scholarship scam",
            "exam paper leak scam",
            "fake certificate scam",
        ],
    ),
    (
        "lottery prize and reward scams",
        [
            "lottery win scam",
            "lucky draw scam",
            "free gift scam",
            "cashback scam",
            "fake coupon scam",
            "festival prize scam",
            "social media giveaway scam",
            "fake survey reward scam",
            "spin-the-wheel scam",
            "fake airline ticket prize scam",
        ],
    ),
    (
        "investment and trading scams",
        [
            "crypto investment scam",
            "Ponzi scheme",
            "MLM scam",
            "fake stock trading platform scam",
            "forex trading scam",
            "binary options scam",
            "NFT rug pull scam",
            "fake mutual fund scam",
            "gold investment scam",
            "real estate investment scam",
        ],
    ),
    (
        "romance and social scams",
        [
            "romance scam",
            "matrimonial scam",
            "dating app scam",
            "fake friendship scam",
            "sextortion scam",
            "fake charity scam",
            "disaster relief scam",
            "NGO donation scam",
            "religious offering scam",
            "fake crowdfunding scam",
        ],
    ),
    (
        "tech support and service scams",
        [
            "fake tech support scam",
            "remote access scam",
            "antivirus renewal scam",
            "fake Microsoft Apple support scam",
            "fake telecom operator scam",
            "broadband upgrade scam",
            "streaming subscription scam",
            "fake recharge offer scam",
            "cloud storage scam",
            "fake app download scam",
        ],
    ),
    (
        "online content and social media scams",
        [
            "fake influencer scam",
            "fake brand collaboration scam",
            "social media impersonation scam",
            "fake follower scam",
            "fake verification badge scam",
            "phishing via shortened links",
            "fake news scam",
            "deepfake scam",
            "fake review scam",
            "fake event ticket scam",
        ],
    ),
    (
        "banking and institutional scams",
        [
            "fake RBI SEBI notice scam",
            "fake bank manager call scam",
            "fake police cyber cell call scam",
            "fake court legal notice scam",
            "fake electricity bill scam",
            "fake water bill scam",
            "fake gas subsidy scam",
            "fake health insurance scam",
            "fake hospital medical bill scam",
            "fake NGO charity fund scam",
        ],
    ),
];

pub(super) const SUMMARY_TEMPLATES: [(&str, &str); 8] = [
    (
        "fake courier delivery scam",
        "Victims get delivery texts urging a small 're-delivery fee' via link, stealing payment details.",
    ),
    (
        "KYC update scam",
        "Urgent messages claim KYC/PAN will be blocked; link leads to phishing page harvesting credentials.",
    ),
    (
        "fake job offer scam",
        "High-paying jobs promised; victims asked to pay 'training' or 'unlock task' fees and lose money.",
    ),
    (
        "lottery win scam",
        "Messages claim a prize win; victims pay 'processing fees' or share sensitive details.",
    ),
    (
        "crypto investment scam",
        "Fraudulent platforms show fake returns, then block withdrawals after larger deposits.",
    ),
    (
        "UPI fraud",
        "Fraudsters trick victims into sharing UPI PIN or making payments through fake UPI links.",
    ),
    (
        "romance scam",
        "Scammers build fake relationships online, then ask for money for emergencies or travel.",
    ),
    (
        "fake tech support scam",
        "Pop-up warnings claim computer is infected; victims call fake support and pay for 'repairs'.",
    ),
];

/// Short system codes used when grouping patterns by parent category.
pub(super) const CATEGORY_CODES: [(&str, &str); 10] = [
    ("identity and account scams", "identity"),
    ("financial and payment scams", "financial"),
    ("commerce and delivery scams", "commerce"),
    ("employment and education scams", "employment"),
    ("lottery prize and reward scams", "lottery"),
    ("investment and trading scams", "investment"),
    ("romance and social scams", "romance"),
    ("tech support and service scams", "tech_support"),
    ("online content and social media scams", "social_media"),
    ("banking and institutional scams", "institutional"),
];
