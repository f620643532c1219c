//! Fixed option lists and constants shown by the registration form.

pub const EVENT_NAME: &str = "HackForge 2.0";

/// Registration fee charged for every team member, in INR.
pub const FEE_PER_MEMBER: u32 = 50;

pub const DEFAULT_COMMUNITY_LINK: &str = "https://chat.whatsapp.com/YOUR_GROUP_LINK";

pub const TRACKS: [&str; 6] = [
    "AI & Machine Learning",
    "Web3 & Blockchain",
    "HealthTech",
    "Cybersecurity",
    "Sustainability",
    "Open Innovation",
];

pub const YEARS: [&str; 4] = ["1st Year", "2nd Year", "3rd Year", "4th Year"];

pub const TEAM_SIZE_OPTIONS: [u8; 3] = [2, 3, 4];
