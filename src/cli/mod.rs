use anyhow::Result;

use crate::db::{
    clear_all_data, create_pool, get_feed_rows, get_team_rows, get_unavailable_players,
    init_database_with_pool, initial_teams, seed_data,
};
use crate::services::{
    merge_teams, momentum_score, normalize_feed, resolver_for, sort_standings, FeedFetcher,
};

pub async fn fetch_feed() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;
    let fetcher = FeedFetcher::new();

    if !fetcher.has_feed_url() {
        println!("❌ FEED_URL not set — nothing to fetch");
        return Ok(());
    }

    println!("📥 Fetching standings feed…");
    let count = fetcher.fetch_snapshot(&pool).await?;
    println!("✅ Stored {} feed rows!", count);
    Ok(())
}

pub async fn show_standings() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    let seed = initial_teams();
    let resolver_kind = std::env::var("NAME_RESOLVER").unwrap_or_default();
    let resolver = resolver_for(&resolver_kind);

    let db_rows = get_team_rows(&pool).await?;
    if db_rows.is_empty() {
        println!("📭 No teams found. Try: courtside seed");
        return Ok(());
    }

    let feed_rows = get_feed_rows(&pool).await?;
    let metrics = normalize_feed(&seed, &feed_rows, resolver.as_ref());
    let mut teams = merge_teams(&db_rows, &seed, &metrics, resolver.as_ref());
    sort_standings(&mut teams);

    println!("\n🏀 Power Ranking — performance recente\n");
    for (rank, team) in teams.iter().enumerate() {
        let form: String = team.record.iter().map(|r| r.as_char()).collect();
        let pct = team
            .stats
            .as_ref()
            .map_or("  n/a".to_string(), |s| format!("{:5.1}", s.win_pct));
        println!(
            "{:>2}. {:<26} {:>3}-{:<3} | últimos 5: {:<5} | momentum {:>2} | aproveitamento {}",
            rank + 1,
            team.name,
            team.wins,
            team.losses,
            form,
            momentum_score(&team.record),
            pct
        );
    }

    let injuries = get_unavailable_players(&pool).await?;
    if !injuries.is_empty() {
        println!("\n🚑 Desfalques:");
        for player in injuries {
            println!(
                "   {} ({}) — {} | retorno previsto: {} [{}]",
                player.name, player.team, player.reason, player.expected_return, player.severity
            );
        }
    }

    Ok(())
}

pub async fn seed() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    println!("🌱 Seeding demo data…");
    clear_all_data(&pool).await?;
    seed_data(&pool).await?;
    println!("✅ Demo data ready! Try: courtside standings");
    Ok(())
}
