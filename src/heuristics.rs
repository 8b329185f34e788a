//! Static reputation heuristics: set membership only, no I/O.
//!
//! Both checks are advisory. They flag throwaway providers and
//! role/function mailboxes but never change whether an address is
//! considered deliverable.

use phf::phf_set;

use crate::report::CheckResult;

static DISPOSABLE_DOMAINS: phf::Set<&'static str> = phf_set! {
    "0-mail.com",
    "10minutemail.com",
    "20minutemail.com",
    "33mail.com",
    "anonbox.net",
    "burnermail.io",
    "byom.de",
    "deadaddress.com",
    "discard.email",
    "dispostable.com",
    "emailondeck.com",
    "fakeinbox.com",
    "fakemail.net",
    "getairmail.com",
    "getnada.com",
    "guerrillamail.biz",
    "guerrillamail.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "inboxkitten.com",
    "incognitomail.com",
    "jetable.org",
    "mail-temporaire.fr",
    "mailcatch.com",
    "maildrop.cc",
    "mailexpire.com",
    "mailinator.com",
    "mailnesia.com",
    "mailsac.com",
    "mintemail.com",
    "mohmal.com",
    "mytemp.email",
    "nowmymail.com",
    "sharklasers.com",
    "spambog.com",
    "spamgourmet.com",
    "tempail.com",
    "temp-mail.org",
    "tempinbox.com",
    "tempmail.dev",
    "tempmailaddress.com",
    "tempr.email",
    "throwawaymail.com",
    "trash-mail.com",
    "trashmail.com",
    "trashmail.net",
    "yopmail.com",
    "yopmail.fr",
    "zehnminutenmail.de",
};

static ROLE_LOCAL_PARTS: phf::Set<&'static str> = phf_set! {
    "abuse",
    "admin",
    "administrator",
    "billing",
    "careers",
    "contact",
    "customercare",
    "customerservice",
    "enquiries",
    "feedback",
    "finance",
    "help",
    "helpdesk",
    "hello",
    "hostmaster",
    "hr",
    "info",
    "inquiries",
    "jobs",
    "legal",
    "mail",
    "marketing",
    "newsletter",
    "no-reply",
    "noreply",
    "office",
    "orders",
    "postmaster",
    "press",
    "privacy",
    "root",
    "sales",
    "security",
    "service",
    "support",
    "team",
    "webmaster",
};

/// Flags domains operated by disposable-mail providers.
pub fn check_disposable(domain: &str) -> CheckResult {
    if DISPOSABLE_DOMAINS.contains(domain.to_ascii_lowercase().as_str()) {
        CheckResult::failed("domain is a known disposable email provider")
    } else {
        CheckResult::passed("domain is not a known disposable provider")
    }
}

/// Flags local parts addressed to a function rather than a person.
pub fn check_role_based(local: &str) -> CheckResult {
    if ROLE_LOCAL_PARTS.contains(local.to_ascii_lowercase().as_str()) {
        CheckResult::failed("local part appears to be role-based")
    } else {
        CheckResult::passed("local part does not appear to be role-based")
    }
}
