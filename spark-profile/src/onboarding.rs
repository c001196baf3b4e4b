//! Onboarding checklist.
//!
//! A profile is complete once every step below is satisfied; only complete
//! profiles are offered to other users in discovery.

use serde::Serialize;

use crate::models::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    BasicInfo,
    Interests,
    Physical,
    Lifestyle,
    Location,
    Details,
    Photos,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 7] = [
        OnboardingStep::BasicInfo,
        OnboardingStep::Interests,
        OnboardingStep::Physical,
        OnboardingStep::Lifestyle,
        OnboardingStep::Location,
        OnboardingStep::Details,
        OnboardingStep::Photos,
    ];

    /// 1-based position in the onboarding flow.
    pub fn number(&self) -> u8 {
        match self {
            OnboardingStep::BasicInfo => 1,
            OnboardingStep::Interests => 2,
            OnboardingStep::Physical => 3,
            OnboardingStep::Lifestyle => 4,
            OnboardingStep::Location => 5,
            OnboardingStep::Details => 6,
            OnboardingStep::Photos => 7,
        }
    }

    pub fn is_complete(&self, profile: &Profile) -> bool {
        match self {
            OnboardingStep::BasicInfo => {
                filled(&profile.display_name)
                    && profile.age.is_some_and(|age| age > 0)
                    && profile.gender().is_some()
                    && filled(&profile.phone)
            }
            OnboardingStep::Interests => !profile.interests().is_empty(),
            OnboardingStep::Physical => {
                filled(&profile.height)
                    && filled(&profile.weight)
                    && !profile.looking_for().is_empty()
                    && profile.age_range().is_valid()
            }
            OnboardingStep::Lifestyle => {
                let lifestyle = profile.lifestyle();
                let all_filled = [
                    &lifestyle.drinking,
                    &lifestyle.smoking,
                    &lifestyle.workout,
                    &lifestyle.diet,
                    &lifestyle.pets,
                ]
                .into_iter()
                .all(filled);
                all_filled
            }
            OnboardingStep::Location => {
                let location = profile.location();
                location.coordinates().is_some() && filled(&location.city)
            }
            // Only reachable after the five earlier steps.
            OnboardingStep::Details => {
                let details = profile.details();
                let own = [
                    &details.job_title,
                    &details.company,
                    &details.education_level,
                    &details.university,
                    &details.bio,
                ]
                .into_iter()
                .all(filled);

                own && Self::ALL[..5].iter().all(|step| step.is_complete(profile))
            }
            OnboardingStep::Photos => profile.photos().len() >= 2,
        }
    }
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct StepStatus {
    pub step: OnboardingStep,
    pub number: u8,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct OnboardingProgress {
    pub steps: Vec<StepStatus>,
    pub completed: usize,
    pub total: usize,
    /// Rounded share of completed steps, 0-100.
    pub percent: u8,
}

impl OnboardingProgress {
    pub fn of(profile: &Profile) -> Self {
        let steps: Vec<StepStatus> = OnboardingStep::ALL
            .iter()
            .map(|step| StepStatus {
                step: *step,
                number: step.number(),
                complete: step.is_complete(profile),
            })
            .collect();

        let completed = steps.iter().filter(|s| s.complete).count();
        let total = steps.len();
        let percent = (completed as f64 / total as f64 * 100.0).round() as u8;

        Self {
            steps,
            completed,
            total,
            percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    pub fn missing(&self) -> Vec<OnboardingStep> {
        self.steps.iter().filter(|s| !s.complete).map(|s| s.step).collect()
    }
}
