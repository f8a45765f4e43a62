use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::anyhow;
use aoc_solver::{AocParser, Example, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use regex::Regex;
use tracing::{debug, trace};

use crate::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};

/// Factory machines: indicator lights and joltage counters
#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2, examples = EXAMPLES)]
#[aoc(year = 2025, day = 10, tags = ["bitmask", "dp"])]
pub struct Solver;

const EXAMPLE_INPUT: &str = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
";

const EXAMPLES: &[Example] = &[
    Example::new(1, EXAMPLE_INPUT, "7"),
    Example::new(2, EXAMPLE_INPUT, "33"),
];

/// Lights are tracked in a `u16` mask
const MAX_LIGHTS: usize = 16;
/// Every subset of buttons is tabulated
const MAX_BUTTONS: usize = 16;

static MACHINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([.#]+)\]((?:\s*\([0-9,]+\))*)\s*\{([0-9,]+)\}$").expect("valid machine regex")
});
static BUTTON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9,]+)\)").expect("valid button regex"));

#[derive(Debug, Clone)]
pub struct Machine {
    lights: u16,
    buttons: Vec<Vec<usize>>,
    joltage: Vec<u16>,
}

/// Net effect of pressing one subset of buttons once each
#[derive(Debug, Clone)]
struct Pattern {
    effect: Vec<u16>,
    presses: u64,
}

impl Machine {
    fn counters(&self) -> usize {
        self.joltage.len()
    }

    /// Every button subset, grouped by which counters it leaves odd
    fn patterns(&self) -> HashMap<u16, Vec<Pattern>> {
        let mut patterns: HashMap<u16, Vec<Pattern>> = HashMap::new();
        for subset in 0u32..1 << self.buttons.len() {
            let mut effect = vec![0u16; self.counters()];
            for (_, button) in self.buttons.iter().enumerate().filter(|(i, _)| subset >> i & 1 == 1) {
                for &counter in button {
                    effect[counter] += 1;
                }
            }
            let parity = parity_of(&effect);
            patterns.entry(parity).or_default().push(Pattern {
                effect,
                presses: u64::from(subset.count_ones()),
            });
        }
        patterns
    }
}

fn parity_of(values: &[u16]) -> u16 {
    values
        .iter()
        .enumerate()
        .fold(0, |mask, (i, v)| mask | ((v & 1) << i))
}

fn parse_machine(line: &str) -> Result<Machine, String> {
    let caps = MACHINE_RE
        .captures(line)
        .ok_or_else(|| "expected '[lights] (buttons)... {joltage}'".to_string())?;

    let pattern = &caps[1];
    if pattern.len() > MAX_LIGHTS {
        return Err(format!("{} lights, at most {} supported", pattern.len(), MAX_LIGHTS));
    }
    let lights = pattern
        .bytes()
        .enumerate()
        .fold(0u16, |mask, (i, b)| if b == b'#' { mask | 1 << i } else { mask });

    let parse_list = |list: &str| -> Result<Vec<usize>, String> {
        list.split(',')
            .map(|v| v.parse::<usize>().map_err(|_| format!("bad number {:?}", v)))
            .collect()
    };

    let buttons = BUTTON_RE
        .captures_iter(&caps[2])
        .map(|button| parse_list(&button[1]))
        .collect::<Result<Vec<_>, _>>()?;
    if buttons.len() > MAX_BUTTONS {
        return Err(format!("{} buttons, at most {} supported", buttons.len(), MAX_BUTTONS));
    }
    if let Some(bad) = buttons.iter().flatten().find(|&&i| i >= pattern.len()) {
        return Err(format!("button wires light {} but there are only {}", bad, pattern.len()));
    }

    let joltage = parse_list(&caps[3])?
        .into_iter()
        .map(|v| u16::try_from(v).map_err(|_| format!("joltage {} too large", v)))
        .collect::<Result<Vec<_>, _>>()?;
    if joltage.len() != pattern.len() {
        return Err(format!("{} joltage values for {} lights", joltage.len(), pattern.len()));
    }

    Ok(Machine {
        lights,
        buttons,
        joltage,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Machine>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, line)| {
                parse_machine(line).map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
            })
            .collect()
    }
}

/// Fewest presses reaching a joltage target.
///
/// A press sequence splits into the buttons pressed an odd number of times
/// (one subset, fixing the parity) and pairs of presses (half of what is
/// left). So `f(t) = min |S| + 2 f((t - effect(S)) / 2)` over subsets `S`
/// with matching parity and `effect(S) <= t`.
struct FewestPresses {
    patterns: HashMap<u16, Vec<Pattern>>,
}

impl FewestPresses {
    /// Usable subsets for `target` with the halved remainder each leaves
    fn steps<'s>(&'s self, target: &'s [u16]) -> impl Iterator<Item = (Vec<u16>, u64)> + 's {
        let candidates = if target.iter().all(|&v| v == 0) {
            None
        } else {
            self.patterns.get(&parity_of(target))
        };
        candidates
            .into_iter()
            .flatten()
            .filter(move |p| p.effect.iter().zip(target).all(|(e, t)| e <= t))
            .map(move |p| {
                let rest = p.effect.iter().zip(target).map(|(e, t)| (t - e) / 2).collect();
                (rest, p.presses)
            })
    }
}

impl DpProblem<Vec<u16>, Option<u64>> for FewestPresses {
    fn deps(&self, target: &Vec<u16>) -> Vec<Vec<u16>> {
        self.steps(target).map(|(rest, _)| rest).collect()
    }

    fn compute(&self, target: &Vec<u16>, deps: Vec<Option<u64>>) -> Option<u64> {
        if target.iter().all(|&v| v == 0) {
            return Some(0);
        }
        self.steps(target)
            .zip(deps)
            .filter_map(|((_, presses), rest)| Some(presses + 2 * rest?))
            .min()
    }
}

fn fewest_light_presses(machine: &Machine) -> Option<u64> {
    (0u32..1 << machine.buttons.len())
        .filter(|subset| {
            let toggled = machine
                .buttons
                .iter()
                .enumerate()
                .filter(|(i, _)| subset >> i & 1 == 1)
                .flat_map(|(_, button)| button)
                .fold(0u16, |mask, &light| mask ^ 1 << light);
            toggled == machine.lights
        })
        .map(|subset| u64::from(subset.count_ones()))
        .min()
}

fn fewest_joltage_presses(machine: &Machine) -> Option<u64> {
    let cache = DpCache::new(
        HashMapBackend::new(),
        FewestPresses {
            patterns: machine.patterns(),
        },
    );
    let presses = cache.get(&machine.joltage);
    trace!(states = cache.into_backend().len(), ?presses, "joltage search done");
    presses
}

fn sum_over_machines(
    machines: &[Machine],
    fewest: impl Fn(&Machine) -> Option<u64>,
) -> Result<String, SolveError> {
    machines
        .iter()
        .enumerate()
        .map(|(idx, machine)| -> Result<u64, SolveError> {
            let presses = fewest(machine)
                .ok_or_else(|| SolveError::failed(anyhow!("machine {} cannot be configured", idx + 1)))?;
            debug!(machine = idx + 1, presses, "configured machine");
            Ok(presses)
        })
        .sum::<Result<u64, _>>()
        .map(|total| total.to_string())
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_over_machines(shared, fewest_light_presses)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_over_machines(shared, fewest_joltage_presses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machines(input: &str) -> Vec<Machine> {
        <Solver as AocParser>::parse(input).unwrap()
    }

    #[test]
    fn test_per_machine_answers() {
        let machines = machines(EXAMPLE_INPUT);
        let lights: Vec<_> = machines.iter().map(fewest_light_presses).collect();
        assert_eq!(lights, vec![Some(2), Some(3), Some(2)]);
        let joltage: Vec<_> = machines.iter().map(fewest_joltage_presses).collect();
        assert_eq!(joltage, vec![Some(10), Some(12), Some(11)]);
    }

    #[test]
    fn test_parse_machine_fields() {
        let machine = parse_machine("[.##.] (3) (1,3) {1,2,3,4}").unwrap();
        assert_eq!(machine.lights, 0b0110);
        assert_eq!(machine.buttons, vec![vec![3], vec![1, 3]]);
        assert_eq!(machine.joltage, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_machine("[.#] (2) {1,1}").is_err());
        assert!(parse_machine("[.#] (1) {1,1,1}").is_err());
        assert!(parse_machine("[.#] (1) 1,1").is_err());
        assert!(parse_machine("[.#] () {1,1}").is_err());
        let too_many = format!("[..] {} {{1,1}}", "(0) ".repeat(MAX_BUTTONS + 1));
        assert!(parse_machine(&too_many).is_err());
    }

    #[test]
    fn test_unreachable_targets() {
        let mut shared = machines("[#.] (1) {1,0}\n");
        assert!(matches!(
            <Solver as PartSolver<1>>::solve(&mut shared),
            Err(SolveError::SolveFailed(_))
        ));
        assert!(matches!(
            <Solver as PartSolver<2>>::solve(&mut shared),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_zero_target_needs_no_presses() {
        let machine = parse_machine("[..] (0,1) {0,0}").unwrap();
        assert_eq!(fewest_light_presses(&machine), Some(0));
        assert_eq!(fewest_joltage_presses(&machine), Some(0));
    }

    #[test]
    fn test_shared_button_counts_twice() {
        // (0,1) then (0) twice: 3 presses reach {3,1}
        let machine = parse_machine("[##] (0,1) (0) {3,1}").unwrap();
        assert_eq!(fewest_joltage_presses(&machine), Some(3));
    }
}
