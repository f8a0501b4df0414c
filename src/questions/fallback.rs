//! Hardcoded question banks used whenever generation fails.
//!
//! Each bank holds exactly as many questions as a round asks for, so the
//! fallback path serves a full round without shuffling.

use super::types::{
    AptitudeQuestion, DebugQuestion, ExperienceLevel, OpenQuestion, QuestionSet, Round, RoundType,
};

type AptitudeRow = (&'static str, [&'static str; 4], &'static str, &'static str, &'static str);
type ManagerialRow = (&'static str, [&'static str; 4], &'static str, &'static str);
type DebugRow = (&'static str, &'static str, &'static str, &'static str, &'static str);

const APTITUDE_FRESHER: &[AptitudeRow] = &[
    ("If 6 workers complete a task in 10 days, how many workers are needed to finish in 5 days?", ["A: 8", "B: 10", "C: 12", "D: 15"], "C", "Workers x Days = constant. 6x10 = Wx5, so W = 12.", "Quantitative"),
    ("Next number in series: 2, 4, 8, 16, ?", ["A: 24", "B: 32", "C: 30", "D: 28"], "B", "Each term doubles. 16x2 = 32.", "Logical"),
    ("Shopkeeper gains 20% profit. Cost 500. Selling price?", ["A: 550", "B: 580", "C: 600", "D: 520"], "C", "SP = 500 x 1.2 = 600.", "Quantitative"),
    ("Antonym of VERBOSE:", ["A: Wordy", "B: Concise", "C: Elaborate", "D: Lengthy"], "B", "Verbose means using too many words. Antonym = Concise.", "Verbal"),
    ("A > B and B > C. Which must be true?", ["A: C > A", "B: A > C", "C: B > A", "D: Cannot determine"], "B", "Transitive: A > B > C, so A > C.", "Logical"),
    ("A can do a job in 12 days, B in 18 days. Together?", ["A: 6 days", "B: 7 days", "C: 7.2 days", "D: 8 days"], "C", "1/12 + 1/18 = 5/36 per day, so 36/5 = 7.2 days.", "Quantitative"),
    ("If today is Monday, what day is 100 days from now?", ["A: Monday", "B: Tuesday", "C: Wednesday", "D: Saturday"], "C", "100 = 14 weeks + 2 days. Monday + 2 = Wednesday.", "Logical"),
    ("Water:Thirst :: Food:?", ["A: Cook", "B: Hunger", "C: Eat", "D: Taste"], "B", "Water quenches thirst; food satisfies hunger.", "Verbal"),
];

const APTITUDE_JUNIOR: &[AptitudeRow] = &[
    ("Train 120m long passes a pole in 6s. Speed in km/h?", ["A: 60", "B: 72", "C: 80", "D: 90"], "B", "20 m/s x 3.6 = 72 km/h.", "Quantitative"),
    ("15% of 360 + 25% of 240 = ?", ["A: 108", "B: 114", "C: 120", "D: 126"], "B", "54 + 60 = 114.", "Quantitative"),
    ("Logical order: 1-Planet 2-Sun 3-Galaxy 4-Solar System", ["A: 2,1,4,3", "B: 1,2,4,3", "C: 2,4,1,3", "D: 1,4,2,3"], "A", "Sun, Planet, Solar System, Galaxy.", "Logical"),
    ("ELBOW:ARM :: KNEE:?", ["A: Foot", "B: Leg", "C: Hip", "D: Joint"], "B", "Elbow is the joint of the arm; knee is the joint of the leg.", "Verbal"),
    ("P(sum=7) when two dice are rolled?", ["A: 1/6", "B: 5/36", "C: 7/36", "D: 1/9"], "A", "6 pairs sum to 7. P = 6/36 = 1/6.", "Quantitative"),
    ("If 2x + 3y = 12 and x - y = 1, find x:", ["A: 2", "B: 3", "C: 4", "D: 5"], "B", "x = y+1; 2(y+1)+3y = 12 gives y = 2, x = 3.", "Quantitative"),
    ("Next: 3, 6, 11, 18, 27, ?", ["A: 36", "B: 38", "C: 40", "D: 42"], "B", "Differences 3,5,7,9,11, so 27+11 = 38.", "Logical"),
    ("X is 20% more than Y. Y is what % less than X?", ["A: 16.67%", "B: 20%", "C: 25%", "D: 18%"], "A", "(20/120) x 100 = 16.67%.", "Quantitative"),
];

const APTITUDE_MID: &[AptitudeRow] = &[
    ("Data Sufficiency: Is x > 0? (1) x^2 > 0 (2) x^3 > 0", ["A: Only 1", "B: Only 2", "C: Both needed", "D: Either alone"], "B", "x^2 > 0 only tells x != 0. x^3 > 0 means x > 0.", "Logical"),
    ("10,000 at 10% CI for 2 years. Amount?", ["A: 12,000", "B: 12,100", "C: 11,000", "D: 12,200"], "B", "10000 x 1.1^2 = 12,100.", "Quantitative"),
    ("5 people in a circle. Distinct arrangements?", ["A: 120", "B: 60", "C: 24", "D: 20"], "C", "(n-1)! = 4! = 24.", "Quantitative"),
    ("All Bloops are Razzles, all Razzles are Lazzles. Then:", ["A: All Lazzles are Bloops", "B: All Bloops are Lazzles", "C: No Bloops are Lazzles", "D: Some Razzles not Lazzles"], "B", "Bloops within Razzles within Lazzles.", "Logical"),
    ("Stock price rose 10% then fell 10%. Net?", ["A: 0%", "B: -1%", "C: +1%", "D: -2%"], "B", "100 to 110 to 99. Net = -1%.", "Quantitative"),
    ("Three cubes with edges 3, 4, 5 cm melted into one. Edge?", ["A: 5cm", "B: 6cm", "C: 7cm", "D: 4cm"], "B", "27+64+125 = 216 = 6^3.", "Quantitative"),
    ("Odd one: 8, 27, 64, 100, 125", ["A: 8", "B: 27", "C: 100", "D: 125"], "C", "100 is not a perfect cube.", "Logical"),
    ("ROAD=URDG, SWAN=?", ["A: VZDQ", "B: VXDQ", "C: VZDP", "D: VZEQ"], "A", "Each letter +3: S to V, W to Z, A to D, N to Q.", "Verbal"),
];

const APTITUDE_EXPERIENCED: &[AptitudeRow] = &[
    ("Revenue grew 20% then fell 20%. Net?", ["A: 0%", "B: -4%", "C: +4%", "D: -2%"], "B", "100 to 120 to 96. Net = -4%.", "Quantitative"),
    ("70% drink tea, 80% drink coffee. Min % drinking both?", ["A: 40%", "B: 50%", "C: 60%", "D: 70%"], "B", "Min overlap = 70+80-100 = 50%.", "Logical"),
    ("Cube painted, cut into 27 pieces. Exactly 2 painted faces?", ["A: 8", "B: 12", "C: 6", "D: 1"], "B", "12 edge pieces (non-corner) have 2 painted faces.", "Logical"),
    ("PV of 10,000 in 2 years at 8%?", ["A: 8,573", "B: 8,000", "C: 9,259", "D: 8,264"], "A", "10000 / 1.08^2 is about 8,573.", "Quantitative"),
    ("10 people shake hands once with each other. Total?", ["A: 40", "B: 45", "C: 50", "D: 90"], "B", "C(10,2) = 45.", "Quantitative"),
    ("Water flows at 10L/min into a 500L tank. A leak empties 2L/min. Fill time?", ["A: 50 min", "B: 62.5 min", "C: 60 min", "D: 45 min"], "B", "Net 8L/min. 500/8 = 62.5 min.", "Quantitative"),
    ("Statement: X needed for Y, Y sufficient for Z. Must be true?", ["A: X sufficient for Z", "B: Z requires X", "C: X alone gives Z", "D: Z needed for Y"], "B", "Y gives Z and Y needs X, so Z indirectly requires X.", "Logical"),
    ("If log(2)=0.301, log(3)=0.477, find log(12)?", ["A: 1.079", "B: 1.099", "C: 1.049", "D: 0.778"], "A", "log(12) = 2log2 + log3 = 0.602 + 0.477 = 1.079.", "Quantitative"),
];

const MANAGERIAL_FRESHER: &[ManagerialRow] = &[
    ("Tell me about a college group project where you had conflict with a team member. How did you resolve it?", ["Specific situation described", "Steps taken to resolve", "Outcome", "Lesson learned"], "Conflict Resolution", "situational"),
    ("How would you handle being assigned a task you've never done with a tight deadline?", ["Ask for guidance proactively", "Break task into steps", "Time management", "Communicate progress"], "Problem Solving", "hypothetical"),
    ("Describe a time you failed at something important. What did you learn?", ["Honest specific failure", "Self-reflection", "Concrete lesson", "Changed behavior after"], "Self-Awareness", "behavioral"),
    ("How do you organize your work when multiple deadlines conflict?", ["Priority setting method", "Tools used", "Communication with others", "Outcome"], "Time Management", "behavioral"),
    ("Give an example where you convinced a group to accept your idea.", ["Context given", "How you presented", "Objections handled", "Result"], "Influence", "situational"),
    ("Tell me about a time you took initiative without being asked.", ["Specific example", "Why you stepped up", "What you did", "Impact"], "Initiative", "behavioral"),
];

const MANAGERIAL_JUNIOR: &[ManagerialRow] = &[
    ("Tell me about pushing back on a manager's request you believed was wrong.", ["Respectful approach", "Evidence/data used", "Outcome", "Relationship preserved"], "Assertiveness", "situational"),
    ("Describe learning a new technology quickly to deliver a project.", ["Speed of learning", "Resources utilized", "What was delivered", "Team impact"], "Adaptability", "behavioral"),
    ("How do you handle two equally urgent projects simultaneously?", ["Stakeholder communication", "Prioritization framework", "Delegation", "Outcome"], "Time Management", "hypothetical"),
    ("Tell me about a production issue you faced and resolved under pressure.", ["Root cause analysis", "Action under pressure", "Communication with team", "Prevention measures"], "Crisis Handling", "situational"),
    ("Tell me about delivering a project with incomplete requirements.", ["How ambiguity managed", "Clarification sought", "Assumptions documented", "Delivery"], "Ambiguity", "behavioral"),
    ("Tell me about a time your estimate was wrong and how you handled it.", ["What caused the miss", "Early escalation", "Recovery plan", "Lesson for future"], "Accountability", "behavioral"),
];

const MANAGERIAL_MID: &[ManagerialRow] = &[
    ("Tell me about leading a project that failed. How did you manage team and stakeholders?", ["Own the failure", "Team morale managed", "Stakeholder communication", "What changed after"], "Leadership Under Failure", "situational"),
    ("Describe influencing a cross-functional team without formal authority.", ["Relationship built", "Data-driven influence", "Alignment strategy", "Measurable outcome"], "Influence", "behavioral"),
    ("How would you handle a high-performer who consistently violates team norms?", ["Private conversation first", "Root cause analysis", "Performance vs behavior", "Escalation path"], "People Management", "hypothetical"),
    ("Tell me about making a decision with insufficient data.", ["Framework used", "Risks identified", "Stakeholder alignment", "Outcome and learning"], "Decision Under Ambiguity", "situational"),
    ("How do you balance technical debt vs feature delivery?", ["Prioritization framework", "Stakeholder education", "Incremental reduction plan", "Communication"], "Technical Leadership", "hypothetical"),
    ("How have you managed a project where scope kept expanding?", ["Scope creep identified early", "Stakeholder alignment", "Trade-offs negotiated", "Delivery outcome"], "Scope Management", "situational"),
];

const MANAGERIAL_EXPERIENCED: &[ManagerialRow] = &[
    ("Tell me about a strategic decision with company-wide impact.", ["Business context", "Decision framework", "Stakeholder buy-in", "Business impact measured"], "Strategic Leadership", "situational"),
    ("How have you built and scaled a high-performing team? Hiring and retention philosophy?", ["Hiring bar articulated", "Onboarding structured", "Culture built", "Retention outcomes"], "Team Scaling", "behavioral"),
    ("Describe delivering difficult news (layoffs, failures, missed targets) to your organization.", ["Transparency exercised", "Empathy shown", "Forward plan communicated", "Medium chosen wisely"], "Executive Communication", "situational"),
    ("Tell me about shutting down a project or product. How did you handle it?", ["Decision criteria", "Team communication", "Stakeholder management", "Resource redeployment"], "Hard Decisions", "situational"),
    ("How do you balance innovation and operational stability?", ["Portfolio approach", "Risk framework", "Team structure", "Outcomes"], "Innovation vs Stability", "behavioral"),
    ("How do you make resource allocation decisions when priorities compete?", ["Strategic alignment", "Data used", "Trade-offs communicated", "Stakeholder buy-in"], "Resource Allocation", "hypothetical"),
];

const DEBUG_FRESHER: &[DebugRow] = &[
    ("Find and fix the bug:", "def add_numbers(a, b):\n    return a - b\n\nprint(add_numbers(5, 3))  # Expected: 8", "Subtraction used instead of addition", "return a + b", "The function subtracts instead of adding."),
    ("Find the bug in this loop:", "def factorial(n):\n    if n == 0:\n        return 1\n    return n * factorial(n)", "Recursive call uses factorial(n), recursing forever", "return n * factorial(n-1)", "Must decrement n to reach the base case."),
    ("Spot the bug:", "arr = [1, 2, 3, 4, 5]\nfor i in range(len(arr)):\n    print(arr[i+1])", "arr[i+1] is out of range when i = len(arr)-1", "print(arr[i])", "Last index + 1 is out of bounds."),
    ("Find the bug:", "def is_even(n):\n    if n % 2 = 0:\n        return True\n    return False", "= used instead of == in the condition", "if n % 2 == 0:", "= is assignment, == is comparison."),
    ("Find the bug:", "x = input('Enter number: ')\nresult = x + 10\nprint(result)", "input() returns a string, which can't be added to 10", "x = int(input('Enter number: '))", "Convert the string to int before arithmetic."),
];

const DEBUG_JUNIOR: &[DebugRow] = &[
    ("Find the bug in this linked list reversal:", "def reverse_list(head):\n    prev = None\n    current = head\n    while current:\n        current.next = prev\n        prev = current\n        current = current.next\n    return prev", "current.next is overwritten before it is saved", "next_node = current.next; current.next = prev; prev = current; current = next_node", "Save the next pointer before rewiring it."),
    ("Find the bug in this binary search:", "def binary_search(arr, target):\n    low, high = 0, len(arr)\n    while low < high:\n        mid = (low + high) // 2\n        if arr[mid] == target: return mid\n        elif arr[mid] < target: low = mid\n        else: high = mid\n    return -1", "low = mid can loop forever", "low = mid + 1", "The search window must shrink every iteration."),
    ("Find the SQL injection vulnerability:", "def get_user(username):\n    query = \"SELECT * FROM users WHERE name = '\" + username + \"'\"\n    return db.execute(query)", "String concatenation allows SQL injection", "db.execute('SELECT * FROM users WHERE name = ?', (username,))", "Never concatenate user input into SQL. Use parameterized queries."),
    ("Find the bug:", "try:\n    result = int(input())\n    print(10 / result)\nexcept:\n    pass", "Bare except silently swallows every error", "except (ValueError, ZeroDivisionError) as e: print(f'Error: {e}')", "Always catch specific exceptions."),
    ("Find the race condition:", "counter = 0\ndef increment():\n    global counter\n    temp = counter\n    time.sleep(0.001)\n    counter = temp + 1", "Two threads both read 0 and both write 1", "Use threading.Lock() around the read-modify-write", "Non-atomic read-modify-write loses updates."),
];

const DEBUG_MID: &[DebugRow] = &[
    ("Find the distributed system bug:", "def transfer_money(from_acc, to_acc, amount):\n    debit(from_acc, amount)\n    credit(to_acc, amount)  # network failure!", "Debit succeeds but credit fails, so money disappears", "Saga with a compensating transaction, or two-phase commit", "Distributed operations are not atomic."),
    ("Find the N+1 query problem:", "users = User.objects.all()\nfor user in users:\n    print(user.profile.bio)", "1 query for users plus N queries for profiles", "users = User.objects.select_related('profile').all()", "select_related joins the table in one query."),
    ("Find the SQL bug:", "SELECT u.name, COUNT(o.id)\nFROM users u\nLEFT JOIN orders o ON u.id = o.user_id\nWHERE o.status = 'completed'\nGROUP BY u.name", "WHERE on the joined column turns the LEFT JOIN into an INNER JOIN", "LEFT JOIN orders o ON u.id = o.user_id AND o.status = 'completed'", "The WHERE filter drops users with no orders."),
    ("Find the integer overflow:", "public long calculateSum(int[] values) {\n    int sum = 0;\n    for (int v : values) sum += v;\n    return sum;\n}", "int accumulator overflows for large inputs", "long sum = 0;", "The accumulator must match the return type."),
    ("Find the deadlock:", "Thread 1: lock(A) then lock(B)\nThread 2: lock(B) then lock(A)", "Each thread holds one lock while waiting for the other", "Acquire locks in one global order", "Consistent lock ordering removes the circular wait."),
];

const DEBUG_EXPERIENCED: &[DebugRow] = &[
    ("Find the cascading failure:", "ServiceA.timeout = 30s\nServiceB.timeout = 29s\nServiceC.timeout = 28s\n# During C outage, threads pile up in A and B", "Without circuit breakers a slow C exhausts thread pools in B then A", "Circuit breaker, bulkhead isolation and exponential backoff", "Circuit breakers fail fast and stop the cascade."),
    ("Find the JWT security vulnerability:", "def verify_jwt(token):\n    header = jwt.decode(token, options={'verify_signature': False})\n    algo = header.get('alg')\n    return jwt.decode(token, secret, algorithms=[algo])", "An attacker sets alg='none' and skips signature checks", "jwt.decode(token, secret, algorithms=['HS256'])", "Never let the token choose its own algorithm."),
    ("Find the eventual consistency bug:", "db_primary.write(user_id, new_balance)\nbalance = db_replica.read(user_id)\nif balance < 0: trigger_fraud_alert()", "The replica may return pre-write data", "Route post-write reads to the primary", "Replication lag makes replicas stale right after a write."),
    ("Find the hot partition problem:", "table.put_item(Key={\n    'pk': str(datetime.now()),\n    'data': payload\n})", "Monotonic keys send every write to one partition", "Prefix the key with a random shard number", "Timestamps as partition keys create hot shards."),
    ("Find the scaling anti-pattern:", "class SessionManager:\n    sessions = {}\n    def create_session(self, user_id):\n        token = generate_token()\n        self.sessions[token] = user_id\n        return token", "In-memory sessions are lost across horizontally scaled servers", "Use a shared session store or stateless tokens", "Each server only sees its own memory."),
];

const TECHNICAL_TEMPLATES: [(&str, &str, [&str; 3]); 4] = [
    ("What is ", "? Explain with a simple real-world example.", ["Clear definition", "Simple real-world example", "Common use case"]),
    ("How does ", " work internally? When would you use it over alternatives?", ["Internal mechanism", "Comparison with alternatives", "Practical example from work"]),
    ("What are the trade-offs of ", " in production? How do you handle edge cases?", ["Performance trade-offs", "Edge cases and error handling", "Production considerations"]),
    ("How would you architect a system using ", " at scale? What are the failure modes and mitigations?", ["Architectural decisions", "Scalability and failure modes", "Operational concerns at scale"]),
];

fn level_index(level: ExperienceLevel) -> usize {
    match level {
        ExperienceLevel::Fresher => 0,
        ExperienceLevel::Junior => 1,
        ExperienceLevel::Mid => 2,
        ExperienceLevel::Experienced => 3,
    }
}

pub fn aptitude(level: ExperienceLevel) -> Vec<AptitudeQuestion> {
    let bank = [APTITUDE_FRESHER, APTITUDE_JUNIOR, APTITUDE_MID, APTITUDE_EXPERIENCED][level_index(level)];
    bank.iter()
        .map(|(question, options, correct, explanation, topic)| AptitudeQuestion {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct: correct.to_string(),
            explanation: explanation.to_string(),
            difficulty: level.difficulty().to_string(),
            topic: topic.to_string(),
        })
        .collect()
}

pub fn managerial(level: ExperienceLevel) -> Vec<OpenQuestion> {
    let bank = [
        MANAGERIAL_FRESHER,
        MANAGERIAL_JUNIOR,
        MANAGERIAL_MID,
        MANAGERIAL_EXPERIENCED,
    ][level_index(level)];
    bank.iter()
        .map(|(question, points, topic, kind)| OpenQuestion {
            question: question.to_string(),
            expected_points: points.iter().map(|p| p.to_string()).collect(),
            difficulty: level.difficulty().to_string(),
            topic: topic.to_string(),
            level_hint: None,
            kind: Some(kind.to_string()),
        })
        .collect()
}

pub fn debug(level: ExperienceLevel) -> Vec<DebugQuestion> {
    let bank = [DEBUG_FRESHER, DEBUG_JUNIOR, DEBUG_MID, DEBUG_EXPERIENCED][level_index(level)];
    bank.iter()
        .map(|(question, code, bug, fix, explanation)| DebugQuestion {
            question: question.to_string(),
            code: code.to_string(),
            bug: bug.to_string(),
            fix: fix.to_string(),
            explanation: explanation.to_string(),
            difficulty: level.difficulty().to_string(),
        })
        .collect()
}

/// One templated question per round topic
pub fn technical(round: &Round, level: ExperienceLevel) -> Vec<OpenQuestion> {
    let (prefix, suffix, points) = TECHNICAL_TEMPLATES[level_index(level)];
    let hint = format!(
        "{} depth: {}, {}",
        level.as_str(),
        points[0].to_lowercase(),
        points[1].to_lowercase()
    );
    round
        .topics
        .iter()
        .map(|topic| OpenQuestion {
            question: format!("{}{}{}", prefix, topic, suffix),
            expected_points: points.iter().map(|p| p.to_string()).collect(),
            difficulty: level.difficulty().to_string(),
            topic: topic.clone(),
            level_hint: Some(hint.clone()),
            kind: None,
        })
        .collect()
}

/// The bank served for a round when generation is unavailable
pub fn for_round(round: &Round, level: ExperienceLevel) -> QuestionSet {
    match round.kind {
        RoundType::Aptitude => QuestionSet::Aptitude(aptitude(level)),
        RoundType::Managerial => QuestionSet::Open(managerial(level)),
        RoundType::Coding | RoundType::Debug => QuestionSet::Debug(debug(level)),
        RoundType::Technical | RoundType::Hr => QuestionSet::Open(technical(round, level)),
    }
}

pub fn hr_questions(company: &str) -> Vec<String> {
    vec![
        format!("Tell me about yourself and what drew you to apply at {}.", company),
        "What are your greatest strengths, and how have you demonstrated them in real situations?".to_string(),
        "Describe a time you faced a significant challenge. How did you overcome it?".to_string(),
        format!("Where do you see yourself in 5 years, specifically within {}?", company),
        format!("Why do you want to join {} over its competitors?", company),
        format!("What makes you the ideal candidate for this position at {}?", company),
    ]
}
