use super::*;
use crate::state::test_helpers::MockRan;
use crate::types::StepKind;

fn analysis() -> Value {
    json!({
        "alarms": [
            { "alarmId": "ALM-1", "severity": "MAJOR", "type": "Cell Down" },
            {
                "alarmId": "ALM-2",
                "severity": "CRITICAL",
                "type": "Backhaul Loss",
                "description": "Fiber cut on ring B.",
                "firstOccurrence": "2025-01-01T10:00:00Z"
            }
        ],
        "kpis": {
            "status": "CRITICAL",
            "retainability": { "callDropRate": 12.5, "threshold": 3 },
            "accessibility": { "erabSetupSuccessRate": 91.2, "threshold": 97 }
        },
        "cells": [
            { "cellId": "CELL-2A", "cellStatus": "UP" },
            { "cellId": "CELL-2B", "cellStatus": "DEGRADED", "connectedUsers": 4, "averageSINR_dB": 1.5 }
        ],
        "recommendations": [{
            "playbookId": "RMD-009",
            "title": "Backhaul Recovery",
            "diagnosticSteps": ["a", "b", "c", "d", "e", "f"],
            "remediationSteps": ["fix it"],
            "estimatedResolutionTime": "2 hours",
            "expectedOutcome": "Link restored",
            "references": ["Runbook 7"]
        }],
        "live_data": {
            "site": { "siteName": "Harbor Point", "status": "DEGRADED" },
            "cells": [{ "cellId": "CELL-2B", "cellState": "INACTIVE" }]
        }
    })
}

// =========================================================================
// intent
// =========================================================================

#[test]
fn classify_explicit_site() {
    let intent = Intent::classify("What's wrong with SITE-002?");
    assert!(intent.site_002);
    assert!(!intent.remediation);
    assert!(intent.targets_site_002());
    assert!(Intent::classify("status of site 002").site_002);
}

#[test]
fn classify_remediation_without_site_is_implicit() {
    let intent = Intent::classify("What should I do next?");
    assert!(intent.remediation);
    assert!(intent.implicit_site_002);
    assert!(intent.targets_site_002());
}

#[test]
fn classify_remediation_naming_other_site() {
    let intent = Intent::classify("Playbook for SITE-001");
    assert!(intent.remediation);
    assert!(!intent.implicit_site_002);
    assert!(!intent.targets_site_002());
}

#[test]
fn classify_critical_alarms() {
    assert!(Intent::classify("Show me all Critical Alarms").critical_alarms);
    assert_eq!(Intent::classify("hello"), Intent::default());
}

// =========================================================================
// site analysis
// =========================================================================

#[tokio::test]
async fn live_site_analysis_renders_payload() {
    let ran = MockRan { analysis: Some(analysis()), ..MockRan::default() };
    let reply = answer(&ran, "What's wrong with SITE-002?", true).await;

    assert!(reply.success);
    assert!(reply.answer.starts_with("**Analysis Complete for SITE-002**\n"));
    assert!(reply.answer.contains("- Active alarms database (2 alarms)"));
    assert!(reply.answer.contains("- Site KPI reports (Status: CRITICAL)"));
    assert!(reply.answer.contains("SITE-002 (Harbor Point) is experiencing"));
    assert!(reply.answer.contains("**Primary Issue:** Backhaul Loss (ALM-2)"));
    assert!(reply.answer.contains("- Started at 2025-01-01T10:00:00Z"));
    assert!(reply.answer.contains("- CELL-2B is DEGRADED (4 connected users)"));
    assert!(reply.answer.contains("Call drop rate: **12.5%** (threshold: 3%)"));
    assert!(reply.answer.contains("SINR on CELL-2B: **1.5 dB**"));
    assert!(reply.answer.contains("1. a\n2. b\n3. c\n4. d\n5. e\n\n"));
    assert!(!reply.answer.contains("6. f"));
    assert_eq!(reply.retrieved_data, analysis());
    assert_eq!(ran.calls(), vec!["analysis:SITE-002".to_string()]);
}

#[tokio::test]
async fn live_site_analysis_trace_has_six_steps() {
    let ran = MockRan { analysis: Some(analysis()), ..MockRan::default() };
    let reply = answer(&ran, "site-002 status", true).await;

    let kinds: Vec<StepKind> = reply.steps.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Reasoning,
            StepKind::Action,
            StepKind::Action,
            StepKind::Reasoning,
            StepKind::Action,
            StepKind::FinalAnswer
        ]
    );
    assert_eq!(reply.steps[5].step_number, 6);
    assert_eq!(
        reply.steps[1].observation.as_deref(),
        Some("Retrieved comprehensive data: 2 alarms, KPI status CRITICAL, 2 cells")
    );
    assert_eq!(
        reply.steps[2].observation.as_deref(),
        Some("Live data confirms: Site status DEGRADED, CELL-2B is INACTIVE")
    );
    assert_eq!(reply.steps[4].observation.as_deref(), Some("Found playbook RMD-009: Backhaul Recovery"));
}

#[tokio::test]
async fn remediation_question_uses_playbook_template() {
    let ran = MockRan { analysis: Some(analysis()), ..MockRan::default() };
    let reply = answer(&ran, "What are the recommended actions?", true).await;

    assert!(reply.answer.starts_with("**Recommended Actions for SITE-002**"));
    assert!(reply.answer.contains("Backhaul Loss affecting CELL-2B at Harbor Point"));
    assert!(reply.answer.contains("**📋 Remediation Playbook:** RMD-009 - \"Backhaul Recovery\""));
    assert!(reply.answer.contains("6. f"));
    assert!(reply.answer.contains("**✅ Remediation Actions:**\n1. fix it\n"));
    assert!(reply.answer.contains("**⏱️ Expected Resolution Time:** 2 hours"));
    assert!(reply.answer.ends_with("**📚 References:**\n- Runbook 7"));
}

#[tokio::test]
async fn empty_analysis_falls_back_to_scenario_values() {
    let ran = MockRan { analysis: Some(json!({})), ..MockRan::default() };
    let reply = answer(&ran, "how to fix it", true).await;

    assert!(reply.answer.contains("Transport Link Failure affecting CELL-2B at Industrial Park Beta"));
    assert!(reply.answer.contains("RMD-001 - \"N2 Interface Link Failure Remediation\""));
    assert!(reply.answer.contains(DEFAULT_DIAGNOSTIC_STEPS));
    assert!(reply.answer.contains(DEFAULT_REMEDIATION_STEPS));
    assert!(reply.answer.contains("15-60 minutes"));
    assert!(reply.answer.ends_with(DEFAULT_REFERENCES));
    assert_eq!(reply.steps[1].observation.as_deref(), Some("Retrieved comprehensive data: 0 alarms, KPI status unknown, 0 cells"));
}

#[tokio::test]
async fn empty_analysis_full_template_defaults() {
    let ran = MockRan { analysis: Some(json!({})), ..MockRan::default() };
    let reply = answer(&ran, "SITE-002?", true).await;

    assert!(reply.answer.contains("(Status: Unknown)"));
    assert!(reply.answer.contains("**Primary Issue:** Transport Link Failure (ALM-983451)"));
    assert!(reply.answer.contains("- Started at Unknown"));
    assert!(reply.answer.contains("- CELL-2B is DOWN (0 connected users)"));
    assert!(reply.answer.contains("**45.7%** (threshold: 2%)"));
    assert!(reply.answer.contains("**88.4%** (threshold: 98%)"));
    assert!(reply.answer.contains("**-2.1 dB**"));
    assert!(reply.answer.contains(DEFAULT_KEY_STEPS));
}

#[tokio::test]
async fn failed_analysis_returns_demo() {
    let ran = MockRan::default();
    let reply = answer(&ran, "What's wrong with SITE-002?", true).await;
    assert_eq!(reply, demo::site_002());
    assert!(reply.answer.contains("(Demo Mode - RAN Services Unavailable)"));
}

#[tokio::test]
async fn non_object_analysis_returns_demo() {
    let ran = MockRan { analysis: Some(Value::Null), ..MockRan::default() };
    assert_eq!(answer(&ran, "site-002", true).await, demo::site_002());
}

#[tokio::test]
async fn offline_site_query_skips_backend() {
    let ran = MockRan { analysis: Some(analysis()), ..MockRan::default() };
    let reply = answer(&ran, "site-002", false).await;
    assert_eq!(reply, demo::site_002());
    assert!(ran.calls().is_empty());
}

#[tokio::test]
async fn offline_implicit_remediation_gets_usage_help() {
    let ran = MockRan::default();
    let reply = answer(&ran, "next steps?", false).await;
    assert!(reply.answer.starts_with("**Query Received:** \"next steps?\""));
    assert!(ran.calls().is_empty());
}

// =========================================================================
// critical alarms
// =========================================================================

#[tokio::test]
async fn live_critical_alarms_summary() {
    let payload = json!({
        "alarms": [{
            "alarmId": "ALM-7",
            "type": "Power Failure",
            "siteId": "SITE-004",
            "cellId": "CELL-4A",
            "description": "Mains lost",
            "firstOccurrence": "2025-02-02T08:00:00Z",
            "impact": "Site on battery"
        }]
    });
    let ran = MockRan { alarms: Some(payload.clone()), ..MockRan::default() };
    let reply = answer(&ran, "show critical alarms", true).await;

    assert!(reply.answer.starts_with("**Critical Alarms Summary**\n"));
    assert!(reply.answer.contains("**Found 1 Critical Alarm(s):**"));
    assert!(reply.answer.contains(
        "\n**ALM-7** - Power Failure\n- **Site:** SITE-004\n- **Cell:** CELL-4A\n- **Issue:** Mains lost\n- **Started:** 2025-02-02T08:00:00Z\n- **Impact:** Site on battery\n"
    ));
    assert!(reply.answer.ends_with("Immediate response required. Investigate and remediate these critical issues."));
    assert_eq!(reply.steps.len(), 3);
    assert_eq!(reply.steps[1].observation.as_deref(), Some("Retrieved 1 critical alarm(s)"));
    assert_eq!(reply.retrieved_data, json!({ "alarms": payload }));
    assert_eq!(ran.calls(), vec!["alarms:CRITICAL".to_string()]);
}

#[tokio::test]
async fn failed_alarms_returns_demo() {
    let ran = MockRan::default();
    assert_eq!(answer(&ran, "critical alarms please", true).await, demo::critical_alarms());
}

#[tokio::test]
async fn offline_alarms_returns_demo() {
    let ran = MockRan::default();
    assert_eq!(answer(&ran, "critical alarms please", false).await, demo::critical_alarms());
    assert!(ran.calls().is_empty());
}

// =========================================================================
// usage help
// =========================================================================

#[tokio::test]
async fn other_questions_get_usage_help() {
    let ran = MockRan::default();
    let reply = answer(&ran, "How is the network?", true).await;
    assert!(reply.answer.starts_with("**Query Received:** \"How is the network?\""));
    assert!(reply.answer.contains("- \"Show me all critical alarms\""));
    assert_eq!(reply.steps.len(), 2);
    assert_eq!(reply.steps[1].kind, StepKind::FinalAnswer);
    assert_eq!(reply.retrieved_data, json!({}));
    assert!(ran.calls().is_empty());
}
