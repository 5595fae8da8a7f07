// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn catalogue_is_a_dag_in_topological_order() {
    let graph = derive_skills(&[], &[], "2026-03-05");
    assert_eq!(graph.nodes.len(), 6);

    let mut seen = std::collections::BTreeSet::new();
    for node in &graph.nodes {
        for dependency in &node.dependencies {
            assert!(
                seen.contains(dependency.as_str()),
                "dependency {dependency} of {} not declared earlier",
                node.id
            );
        }
        seen.insert(node.id.as_str());
        assert_eq!(node.tiers.len(), 5);
        assert_eq!(node.max_tier, 5);
    }
}

#[test]
fn empty_artifacts_lock_everything() {
    let graph = derive_skills(&[], &[], "2026-03-05");
    for node in &graph.nodes {
        assert_eq!(node.state, SkillState::Locked, "{} should be locked", node.id);
        assert_eq!(node.tier, 0);
        assert!((node.progress - 0.0).abs() < f64::EPSILON);
    }
}

#[test]
fn derivation_is_deterministic() {
    let artifacts = texts(&["cron schedule job watchdog status dashboard"]);
    let paths = texts(&["memory/2026-03-05.md"]);
    let a = derive_skills(&artifacts, &paths, "2026-03-05");
    let b = derive_skills(&artifacts, &paths, "2026-03-05");
    assert_eq!(a, b);
    assert_eq!(a.seed.len(), 12);
    assert!(a.seed.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn seed_changes_with_day_and_paths() {
    let artifacts = texts(&[""]);
    let paths = texts(&["memory/2026-03-05.md"]);
    let a = derive_skills(&artifacts, &paths, "2026-03-05");
    let b = derive_skills(&artifacts, &paths, "2026-03-06");
    let c = derive_skills(&artifacts, &texts(&["memory/other.md"]), "2026-03-05");
    assert_ne!(a.seed, b.seed);
    assert_ne!(a.seed, c.seed);
}

#[test]
fn single_hit_promotes_to_tier_one_planned() {
    // One keyword hit: progress 1/8 floors to tier 0, promoted to 1.
    let graph = derive_skills(&texts(&["a lone cron mention"]), &[], "2026-03-05");
    let scheduling = &graph.nodes[0];
    assert_eq!(scheduling.id, "scheduling");
    assert_eq!(scheduling.tier, 1);
    assert_eq!(scheduling.state, SkillState::Planned);
}

#[test]
fn saturated_hits_activate_a_root_skill() {
    let artifact = "cron ".repeat(10);
    let graph = derive_skills(&texts(&[&artifact]), &[], "2026-03-05");
    let scheduling = &graph.nodes[0];
    assert_eq!(scheduling.tier, 5);
    assert!((scheduling.progress - 1.0).abs() < f64::EPSILON);
    assert_eq!(scheduling.state, SkillState::Active);
}

#[test]
fn dependent_skill_stays_locked_until_dependency_activates() {
    // Observability has hits but scheduling has none: deps unmet, locked.
    let graph = derive_skills(
        &texts(&["status dashboard payload snapshot journal trend metric status"]),
        &[],
        "2026-03-05",
    );
    let observability = &graph.nodes[1];
    assert_eq!(observability.id, "observability");
    assert!(observability.tier >= 3);
    assert_eq!(observability.state, SkillState::Locked);

    // With scheduling saturated too, the same hits activate it.
    let artifact = format!("{} {}", "cron ".repeat(10), "status dashboard payload snapshot journal trend metric status");
    let graph = derive_skills(&texts(&[&artifact]), &[], "2026-03-05");
    assert_eq!(graph.nodes[0].state, SkillState::Active);
    assert_eq!(graph.nodes[1].state, SkillState::Active);
}
