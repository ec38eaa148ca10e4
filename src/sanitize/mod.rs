// src/sanitize/mod.rs
//
// One-way anonymization of a parsed export. Names, emails, companies and
// message text are replaced; dates, ids and every count are kept. Every name
// goes through one case-insensitive map, so sender-to-connection joins and
// the analyses built on them come out the same as on the real export.

pub mod companies;
pub mod messages;
pub mod names;
pub mod pools;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::info;

use crate::classify::Keywords;
use crate::export::Export;

pub use companies::{classify_company, CompanyMap};
pub use messages::{replacement_text, sanitize_messages};
pub use names::{hash_to_name, FakeName, NameMap};

/// Offset between the name stream and the text stream seeds.
const TEXT_SEED_OFFSET: u64 = 57;

fn fake_email(first: &str, last: &str, rng: &mut StdRng) -> String {
    let domain = pools::EMAIL_DOMAINS.choose(rng).copied().unwrap_or("pm.me");
    format!("{}.{}@{}", first.to_lowercase(), last.to_lowercase(), domain)
}

/// Sanitize a full export. Deterministic for a given `seed`.
pub fn sanitize_all(export: &Export, keywords: &Keywords, seed: u64) -> Export {
    let mut name_rng = StdRng::seed_from_u64(seed);
    let mut text_rng = StdRng::seed_from_u64(seed.wrapping_add(TEXT_SEED_OFFSET));
    let mut out = export.clone();

    // 1) names and emails
    let mut names = NameMap::build(&export.connections, &mut name_rng);
    for conn in &mut out.connections {
        if let Some(fake) = names.get(&conn.full_name()) {
            conn.first_name = fake.first_name.clone();
            conn.last_name = fake.last_name.clone();
        }
        if !conn.email_address.is_empty() {
            conn.email_address = fake_email(&conn.first_name, &conn.last_name, &mut text_rng);
        }
    }

    // 2) companies
    let companies = CompanyMap::build(export);
    for conn in &mut out.connections {
        companies.apply(&mut conn.company);
    }
    for follow in &mut out.company_follows {
        companies.apply(&mut follow.company);
    }

    // 3) messages
    out.messages = sanitize_messages(&export.messages, &mut names, keywords, &mut text_rng);

    // 4) invitations
    for inv in &mut out.invitations {
        if !inv.from_name.is_empty() {
            inv.from_name = names.resolve(&inv.from_name);
        }
        if !inv.to_name.is_empty() {
            inv.to_name = names.resolve(&inv.to_name);
        }
        if !inv.message.is_empty() {
            inv.message = pools::GENUINE_MESSAGES
                .choose(&mut text_rng)
                .copied()
                .unwrap_or_default()
                .to_string();
        }
    }

    // inferences and ad targeting are LinkedIn's own categories, no PII

    info!(
        names = names.len(),
        companies = companies.len(),
        messages = out.messages.len(),
        "sanitization complete"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze_all, Tier};
    use crate::config::Config;
    use crate::export::{parse_date, CompanyFollow, Connection, Invitation, Message};
    use std::collections::HashSet;

    fn sample() -> Export {
        Export {
            connections: vec![
                Connection {
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    company: "Klaviyo".into(),
                    position: "CTO".into(),
                    connected_on: parse_date("12 Jan 2020"),
                    email_address: "ada@example.com".into(),
                },
                Connection {
                    first_name: "Alan".into(),
                    last_name: "Turing".into(),
                    company: "Bletchley Analytics".into(),
                    position: "Engineer".into(),
                    connected_on: parse_date("1 Feb 2021"),
                    email_address: String::new(),
                },
            ],
            messages: vec![Message {
                conversation_id: Some("c1".into()),
                sender: "Ada Lovelace".into(),
                date: parse_date("2024-01-01 10:00:00 UTC"),
                subject: "Hello".into(),
                content: "Private content".into(),
            }],
            invitations: vec![Invitation {
                from_name: "Alan Turing".into(),
                to_name: "Somebody Else".into(),
                message: "Let's connect".into(),
                ..Default::default()
            }],
            company_follows: vec![CompanyFollow {
                company: "Klaviyo".into(),
                followed_on: parse_date("2022-02-02"),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn removes_real_identifiers() {
        let real = sample();
        let clean = sanitize_all(&real, &Keywords::default(), 42);

        let real_names: HashSet<String> =
            real.connections.iter().map(Connection::full_name).collect();
        for conn in &clean.connections {
            assert!(!real_names.contains(&conn.full_name()));
            assert_ne!(conn.company, "Klaviyo");
        }
        assert!(clean.connections[0].email_address.starts_with(&format!(
            "{}.{}@",
            clean.connections[0].first_name.to_lowercase(),
            clean.connections[0].last_name.to_lowercase()
        )));
        assert_eq!(clean.connections[1].email_address, "");

        assert_eq!(clean.messages[0].sender, clean.connections[0].full_name());
        assert_ne!(clean.messages[0].content, "Private content");
        assert_eq!(clean.invitations[0].from_name, clean.connections[1].full_name());
        assert_ne!(clean.invitations[0].to_name, "Somebody Else");
        assert!(pools::GENUINE_MESSAGES.contains(&clean.invitations[0].message.as_str()));
        assert_eq!(clean.company_follows[0].company, clean.connections[0].company);
    }

    #[test]
    fn preserves_structure() {
        let real = sample();
        let clean = sanitize_all(&real, &Keywords::default(), 42);

        assert_eq!(clean.connections.len(), real.connections.len());
        assert_eq!(clean.connections[0].position, "CTO");
        assert_eq!(clean.connections[0].connected_on, real.connections[0].connected_on);
        assert_eq!(clean.messages[0].date, real.messages[0].date);
        assert_eq!(clean.messages[0].conversation_id, real.messages[0].conversation_id);
        assert_eq!(clean.company_follows[0].followed_on, real.company_follows[0].followed_on);
    }

    #[test]
    fn same_seed_same_output() {
        let real = sample();
        let kw = Keywords::default();
        assert_eq!(sanitize_all(&real, &kw, 5), sanitize_all(&real, &kw, 5));
    }

    #[test]
    fn tiers_and_clusters_survive_sanitizing() {
        let now = parse_date("2024-06-01 12:00:00").unwrap();
        let mut export = Export {
            connections: (0..40)
                .map(|i| Connection {
                    first_name: format!("Known{}", i),
                    last_name: "Person".into(),
                    position: if i % 2 == 0 { "CTO" } else { "Recruiter" }.into(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        // same person as "Known3 Person", different case
        export.messages.push(Message {
            sender: "known3 person".into(),
            date: Some(now),
            content: "Lunch next week?".into(),
            ..Default::default()
        });
        export.messages.extend((0..2000).map(|i| Message {
            sender: format!("Stranger{} Outside", i),
            date: Some(now),
            content: "Thanks for the notes".into(),
            ..Default::default()
        }));

        let cfg = Config::default();
        let real = analyze_all(&export, &cfg, now);
        let fake = analyze_all(&sanitize_all(&export, &cfg.keywords, 42), &cfg, now);

        assert_eq!(real.relationship_tiers.distribution.get(Tier::Active), 1);
        assert_eq!(
            real.relationship_tiers.distribution,
            fake.relationship_tiers.distribution
        );
        let counts = |a: &crate::analyze::Analysis| -> Vec<(String, usize)> {
            a.network_clusters
                .iter()
                .map(|c| (c.name.clone(), c.count))
                .collect()
        };
        assert_eq!(counts(&real), counts(&fake));
    }

    #[test]
    fn stranger_senders_get_distinct_fakes() {
        let export = Export {
            messages: (0..500)
                .map(|i| Message {
                    sender: format!("Stranger{} Outside", i),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        let clean = sanitize_all(&export, &Keywords::default(), 42);
        let senders: HashSet<&str> = clean.messages.iter().map(|m| m.sender.as_str()).collect();
        assert_eq!(senders.len(), 500);
    }
}
