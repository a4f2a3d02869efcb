use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

/// Raw card details handed over by the caller instead of a stored authorization.
#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Card {
    pub card_number: Secret<String>,
    pub card_exp_month: Secret<String>,
    pub card_exp_year: Secret<String>,
    #[serde(default)]
    pub card_cvc: Option<Secret<String>>,
    #[serde(default)]
    pub first_name: Option<Secret<String>>,
    #[serde(default)]
    pub last_name: Option<Secret<String>>,
}

impl Card {
    /// Full name on the card, `first last`, skipping whichever half is missing.
    pub fn get_card_holder_name(&self) -> Option<Secret<String>> {
        let name = [self.first_name.as_ref(), self.last_name.as_ref()]
            .into_iter()
            .flatten()
            .map(|part| part.peek().trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then(|| Secret::new(name))
    }
}
