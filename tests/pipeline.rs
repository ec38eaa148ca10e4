use anyhow::Result;
use chrono::NaiveDate;
use linkviz::{
    analyze::{analyze_all, Analysis, Tier},
    config::Config,
    export::{load_export, parse_all},
    output::write_json,
    report::{generate_all, Render, DASHBOARD_TEMPLATE},
    sanitize::sanitize_all,
};
use std::{fs, path::Path};
use tempfile::tempdir;

fn write_export(dir: &Path) -> Result<()> {
    fs::write(
        dir.join("Connections.csv"),
        "Notes:\n\"When exporting your connection data...\"\n\n\
         First Name,Last Name,URL,Email Address,Company,Position,Connected On\n\
         Ada,Lovelace,https://x/ada,ada@example.com,Klaviyo,CTO,12 Jan 2020\n\
         Alan,Turing,https://x/alan,,Glow Skin Labs,Software Engineer,03 Mar 2023\n\
         Grace,Hopper,https://x/grace,,Northwind Capital,Partner,15 Nov 2023\n",
    )?;
    let mut messages = String::from(
        "CONVERSATION ID,FROM,DATE,SUBJECT,CONTENT\n\
         c1,Ada Lovelace,2024-01-10 09:00:00 UTC,Coffee,Could we meet for coffee next week?\n\
         c1,Me Myself,2024-01-09 09:00:00 UTC,Coffee,Sure thing\n\
         c2,Pat Recruiter,2024-01-05 10:00:00 UTC,,We're hiring and I noticed your profile\n\
         c3,grace hopper,2023-12-20 10:00:00 UTC,Notes,Thanks for the talk notes\n",
    );
    for i in 0..300 {
        messages.push_str(&format!(
            "s{i},Stranger{i} Outside,2024-01-25 10:00:00 UTC,,Thanks for the notes\n"
        ));
    }
    fs::write(dir.join("messages.csv"), messages)?;
    fs::write(
        dir.join("Invitations.csv"),
        "From,To,Sent At,Message,Direction\n\
         Grace Hopper,Me Myself,2023-11-14,Hi there,INCOMING\n\
         Me Myself,Alan Turing,2023-03-02,,OUTGOING\n",
    )?;
    fs::write(
        dir.join("Company Follows.csv"),
        "Organization,Followed On\nKlaviyo,2022-02-02\n",
    )?;
    Ok(())
}

#[test]
fn parse_sanitize_analyze_render() -> Result<()> {
    let export_dir = tempdir()?;
    write_export(export_dir.path())?;
    let out = tempdir()?;
    let now = NaiveDate::from_ymd_opt(2024, 2, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap();
    let cfg = Config::default();

    // 1) parse, then round-trip through the JSON the CLI writes
    let export = parse_all(export_dir.path());
    assert_eq!(export.connections.len(), 3);
    assert_eq!(export.messages.len(), 304);
    assert_eq!(export.invitations.len(), 2);
    let parsed_path = out.path().join("parsed.json");
    write_json(&parsed_path, &export)?;
    assert_eq!(load_export(&parsed_path)?, export);

    // 2) sanitize
    let clean = sanitize_all(&export, &cfg.keywords, cfg.seed);
    let clean_json = serde_json::to_string(&clean)?;
    for secret in ["Lovelace", "Turing", "Hopper", "Klaviyo", "ada@example.com", "coffee next week"] {
        assert!(!clean_json.contains(secret), "{} leaked", secret);
    }

    // 3) analyze both; structure survives sanitization
    let real = analyze_all(&export, &cfg, now);
    let fake = analyze_all(&clean, &cfg, now);
    assert_eq!(real.summary_stats, fake.summary_stats);
    assert_eq!(real.summary_stats.total_connections, 3);
    assert_eq!(real.summary_stats.total_conversations, 303);
    assert_eq!(real.relationship_tiers.total, 3);
    assert_eq!(fake.relationship_tiers.total, 3);
    // Ada (exact case) and Grace (lowercase sender) are both matched
    assert_eq!(real.relationship_tiers.distribution.get(Tier::Active), 1);
    assert_eq!(real.relationship_tiers.distribution.get(Tier::SomeContact), 1);
    assert_eq!(
        real.relationship_tiers.distribution,
        fake.relationship_tiers.distribution
    );
    let cluster_counts = |a: &Analysis| -> Vec<(String, usize)> {
        a.network_clusters
            .iter()
            .map(|c| (c.name.clone(), c.count))
            .collect()
    };
    assert_eq!(cluster_counts(&real), cluster_counts(&fake));
    let connection_messages = |a: &Analysis| {
        a.high_value_messages
            .iter()
            .filter(|m| m.is_connection)
            .count()
    };
    assert_eq!(connection_messages(&real), connection_messages(&fake));
    assert_eq!(real.invitation_trends.len(), fake.invitation_trends.len());

    // 4) render
    let templates = tempdir()?;
    fs::write(templates.path().join(DASHBOARD_TEMPLATE), "<script>{{DATA}}</script>")?;
    fs::write(templates.path().join("summary-stats.html"), "{{DATA}}")?;
    let site = out.path().join("site");
    let generated = generate_all(&Render {
        template_dir: templates.path(),
        output_dir: &site,
        data: &fake,
        theme_css: "",
        generated_at: now,
    })?;
    assert_eq!(generated.individual, vec![site.join("summary-stats.html")]);
    let html = fs::read_to_string(site.join(DASHBOARD_TEMPLATE))?;
    assert!(html.contains("\"total_connections\":3"));
    assert!(!html.contains("Lovelace"));
    Ok(())
}
