//! Plain-text rendering of a [`SessionReport`] for the console.

use crate::report::domain::rate_summary::RateSummary;
use crate::report::domain::session_report::SessionReport;
use crate::report::domain::vital_summary::VitalSummary;

const RULE: &str = "============================================================";

pub fn render(report: &SessionReport) -> String {
    let mut lines = vec![RULE.to_string(), "SESSION SUMMARY".to_string(), RULE.to_string()];

    let health = &report.session_summary.overall_health_status;
    lines.push(format!(
        "Overall health: {}/100 ({})",
        health.score,
        health.status.as_str()
    ));
    section(&mut lines, "Issues", &report.session_summary.overall_health_status.issues);
    section(&mut lines, "Key findings", &report.session_summary.key_findings);
    section(&mut lines, "Recommendations", &report.session_summary.recommendations);

    lines.push(String::new());
    lines.push("VITALS".to_string());
    let vitals = &report.physiological_vitals;
    lines.push(rate_line("Heart rate", &vitals.heart_rate));
    lines.push(rate_line("Breathing rate", &vitals.breathing_rate));
    lines.push(match &vitals.hrv {
        VitalSummary::Detected(hrv) => format!(
            "  HRV: SDNN {:.1} ms, RMSSD {:.1} ms, {} stress",
            hrv.sdnn,
            hrv.rmssd,
            hrv.stress_level.as_str()
        ),
        missing => format!("  HRV: {}", status_of(missing)),
    });

    lines.push(String::new());
    lines.push("EYE & ATTENTION".to_string());
    let eyes = &report.eye_attention;
    lines.push(rate_line("Blink rate", &eyes.blink_rate));
    lines.push(match &eyes.gaze {
        VitalSummary::Detected(gaze) => format!(
            "  Gaze: {:.1}% centre ({})",
            gaze.center_gaze_percentage,
            gaze.recommendation
        ),
        missing => format!("  Gaze: {}", status_of(missing)),
    });

    lines.push(String::new());
    lines.push("POSTURE & BEHAVIOR".to_string());
    let behavior = &report.posture_behavior;
    lines.push(match &behavior.posture {
        VitalSummary::Detected(p) => format!(
            "  Posture: {} (average score {:.1}, {:.1}% good)",
            p.status.as_str(),
            p.average_score,
            p.consistency_percentage
        ),
        missing => format!("  Posture: {}", status_of(missing)),
    });
    lines.push(match &behavior.head_pose {
        VitalSummary::Detected(h) => format!(
            "  Head pose: pitch {:.1}, yaw {:.1}, roll {:.1}",
            h.average_pitch, h.average_yaw, h.average_roll
        ),
        missing => format!("  Head pose: {}", status_of(missing)),
    });
    lines.push(match &behavior.movement {
        VitalSummary::Detected(m) => format!(
            "  Movement: {} ({:.1}% restless)",
            m.status.as_str(),
            m.restlessness_percentage
        ),
        missing => format!("  Movement: {}", status_of(missing)),
    });

    lines.push(String::new());
    lines.push("EMOTION".to_string());
    lines.push(match &report.emotion {
        VitalSummary::Detected(e) => format!(
            "  Dominant: {} ({:.1}%)",
            e.dominant_emotion, e.dominant_percentage
        ),
        missing => format!("  Dominant: {}", status_of(missing)),
    });
    lines.push(format!(
        "  Active action units: {:.2} on average",
        report.facial_action_units.average_active
    ));

    lines.push(String::new());
    lines.push("CAPTURE".to_string());
    let capture = &report.capture_info;
    lines.push(format!(
        "  {} frames in {:.2}s at {} fps",
        capture.frames_captured, capture.duration_seconds, capture.fps
    ));
    lines.push(format!(
        "  {} behavioral samples ({}), {} vital samples ({})",
        capture.behavioral_samples,
        capture.sample_intervals.behavioral,
        capture.vital_samples,
        capture.sample_intervals.vitals
    ));
    lines.push(RULE.to_string());

    lines.join("\n")
}

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    lines.push(format!("{title}:"));
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

fn rate_line<S>(name: &str, summary: &RateSummary<S>) -> String {
    match (summary.average, summary.min, summary.max) {
        (Some(avg), Some(min), Some(max)) => format!(
            "  {name}: {avg:.1} {} (range {min:.1}-{max:.1}, {}, {})",
            summary.unit,
            summary.status.as_str(),
            summary.trend.as_str()
        ),
        _ => match summary.final_value {
            Some(value) => format!(
                "  {name}: {value:.1} {} ({})",
                summary.unit,
                summary.status.as_str()
            ),
            None => format!("  {name}: {}", summary.status.as_str()),
        },
    }
}

fn status_of<T>(summary: &VitalSummary<T>) -> &'static str {
    match summary {
        VitalSummary::Detected(_) => "detected",
        VitalSummary::Insufficient => "insufficient_data",
        VitalSummary::NotDetected => "not_detected",
    }
}
