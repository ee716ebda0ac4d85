//! Canned agent replies used when live RAN lookups are off or fail.

use serde_json::json;

use crate::types::{AgentReply, StepLog};

const SITE_002_ANSWER: &str = "**Analysis Complete for SITE-002** (Demo Mode - RAN Services Unavailable)

**🔍 Retrieval Phase:**
I retrieved data from multiple sources:
- Active alarms database
- Site KPI reports
- Cell-level RF metrics

**🔬 Root Cause Analysis:**
SITE-002 (Industrial Park Beta) is experiencing a **critical service outage**:

**Primary Issue:** Transport Link Failure (ALM-983451)
- N2 interface to AMF-01 is down
- Started at 15:55:10 today

**Impact:**
- CELL-2B is completely offline (0 connected users)
- Call drop rate: **45.7%** (threshold: 2%)
- E-RAB setup success: **88.4%** (threshold: 98%)

**💡 Recommended Solution:**
Follow **Remediation Playbook RMD-001**: \"N2 Interface Link Failure Remediation\"

Would you like me to retrieve the detailed diagnostic steps from the playbook?";

const CRITICAL_ALARMS_ANSWER: &str = "**Critical Alarms Summary** (Demo Mode - RAN Services Unavailable)

**🔍 Retrieval:** Searched alarm database for CRITICAL severity

**Found 1 Critical Alarm:**

**ALM-983451** - Transport Link Failure
- **Site:** SITE-002 (Industrial Park Beta)
- **Cell:** CELL-2B
- **Issue:** N2 interface to AMF-01 is down. No communication with 5G core network.";

#[must_use]
pub fn site_002() -> AgentReply {
    AgentReply {
        success: true,
        answer: SITE_002_ANSWER.to_string(),
        steps: StepLog::new()
            .reasoning("Parsing query - user asking about SITE-002 issues")
            .action(
                "get_alarms (site_id: SITE-002)",
                "Found 2 alarms: CRITICAL N2 link failure (ALM-983451), MAJOR cell down (ALM-983452)",
            )
            .finish(),
        retrieved_data: json!({}),
    }
}

#[must_use]
pub fn critical_alarms() -> AgentReply {
    AgentReply {
        success: true,
        answer: CRITICAL_ALARMS_ANSWER.to_string(),
        steps: StepLog::new().reasoning("User requesting critical alarms - will filter by severity").finish(),
        retrieved_data: json!({}),
    }
}
