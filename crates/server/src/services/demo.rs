//! Random sample registrations for demo mode.
//!
//! Samples are shaped exactly like a create request body and always pass
//! validation. They are only served when `DEMO_ENABLED` is set.

use customer_registry_core::{FavoriteColor, TaxId};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Beatriz", "Bruno", "Camila", "Diego", "Eduarda", "Felipe", "Fernanda", "Gabriela",
    "Gustavo", "Heitor", "Isabela", "Juliana", "Larissa", "Lucas", "Mariana", "Pedro", "Rafael",
    "Thiago", "Vinicius",
];

const LAST_NAMES: &[&str] = &[
    "Almeida", "Alves", "Carvalho", "Costa", "Ferreira", "Gomes", "Lima", "Martins", "Oliveira",
    "Pereira", "Ribeiro", "Rodrigues", "Santos", "Silva", "Souza",
];

const NOTES: &[&str] = &[
    "Prefere contato por email.",
    "Cliente indicado por um amigo.",
    "Interessado em novidades da loja.",
    "Gostaria de receber o catálogo impresso.",
    "Atendimento preferencialmente à tarde.",
];

/// A create request body filled with plausible random data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRegistration {
    pub full_name: String,
    /// Formatted as `000.000.000-00`.
    pub cpf: String,
    pub email: String,
    pub favorite_color: FavoriteColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// Generate a sample using the thread-local RNG.
#[must_use]
pub fn sample_registration() -> SampleRegistration {
    sample_registration_with(&mut rand::rng())
}

/// Generate a sample from the given RNG.
pub fn sample_registration_with<R: Rng + ?Sized>(rng: &mut R) -> SampleRegistration {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ana");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Silva");
    let favorite_color = FavoriteColor::ALL
        .choose(rng)
        .copied()
        .unwrap_or(FavoriteColor::Blue);

    SampleRegistration {
        full_name: format!("{first} {last}"),
        cpf: random_tax_id(rng).formatted(),
        email: format!(
            "{}.{}{}@example.com",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase(),
            rng.random_range(1..1000)
        ),
        favorite_color,
        observations: rng
            .random_bool(0.5)
            .then(|| NOTES.choose(rng).copied().unwrap_or_default().to_owned()),
    }
}

fn random_tax_id<R: Rng + ?Sized>(rng: &mut R) -> TaxId {
    loop {
        let base: [u8; 9] = std::array::from_fn(|_| rng.random_range(0..10));
        // Only repeated-digit bases are rejected, so this rarely loops.
        if let Some(tax_id) = TaxId::from_base(base) {
            return tax_id;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_registry_core::validate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_samples_always_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sample = sample_registration_with(&mut rng);
            let body = serde_json::to_value(&sample).unwrap();
            let customer = validate(&body).unwrap();

            assert_eq!(customer.full_name.as_str(), sample.full_name);
            assert_eq!(customer.tax_id.formatted(), sample.cpf);
            assert_eq!(customer.email.as_str(), sample.email);
        }
    }

    #[test]
    fn test_sample_wire_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = serde_json::to_value(sample_registration_with(&mut rng)).unwrap();

        assert!(body["fullName"].is_string());
        assert!(body["cpf"].as_str().unwrap().contains('-'));
        assert!(body["email"].as_str().unwrap().ends_with("@example.com"));
        assert!(body["favoriteColor"].is_string());
    }
}
