//! Catalogue read service: categories, areas, ingredients and testimonials.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository, UserRepository};
use crate::domain::{
    Area, Category, Error, Ingredient, RecordId, TestimonialView, UserSummary,
};

/// Message returned when a category identifier does not resolve.
pub const CATEGORY_NOT_FOUND: &str = "Category not found";
/// Message returned when an area identifier does not resolve.
pub const AREA_NOT_FOUND: &str = "Area not found";
/// Message returned when an ingredient identifier does not resolve.
pub const INGREDIENT_NOT_FOUND: &str = "Ingredient not found";

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService<C, U> {
    catalogue: Arc<C>,
    users: Arc<U>,
}

impl<C, U> CatalogueService<C, U> {
    /// Create a new service over the given repositories.
    pub fn new(catalogue: Arc<C>, users: Arc<U>) -> Self {
        Self { catalogue, users }
    }
}

fn single<T>(found: Vec<T>, missing: &str) -> Result<T, Error> {
    found
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found(missing))
}

#[async_trait]
impl<C, U> CatalogueQuery for CatalogueService<C, U>
where
    C: CatalogueRepository,
    U: UserRepository,
{
    async fn categories(&self) -> Result<Vec<Category>, Error> {
        Ok(self.catalogue.list_categories().await?)
    }

    async fn areas(&self) -> Result<Vec<Area>, Error> {
        Ok(self.catalogue.list_areas().await?)
    }

    async fn ingredients(&self) -> Result<Vec<Ingredient>, Error> {
        Ok(self.catalogue.list_ingredients().await?)
    }

    async fn category(&self, id: RecordId) -> Result<Category, Error> {
        let found = self.catalogue.categories_by_ids(&[id]).await?;
        single(found, CATEGORY_NOT_FOUND)
    }

    async fn area(&self, id: RecordId) -> Result<Area, Error> {
        let found = self.catalogue.areas_by_ids(&[id]).await?;
        single(found, AREA_NOT_FOUND)
    }

    async fn ingredient(&self, id: RecordId) -> Result<Ingredient, Error> {
        let found = self.catalogue.ingredients_by_ids(&[id]).await?;
        single(found, INGREDIENT_NOT_FOUND)
    }

    async fn testimonials(&self) -> Result<Vec<TestimonialView>, Error> {
        let testimonials = self.catalogue.list_testimonials().await?;
        let owner_ids: Vec<RecordId> = testimonials
            .iter()
            .filter_map(|testimonial| testimonial.owner)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<RecordId, UserSummary> = if owner_ids.is_empty() {
            HashMap::new()
        } else {
            self.users
                .find_many(&owner_ids)
                .await?
                .iter()
                .map(|user| (user.id, UserSummary::from(user)))
                .collect()
        };

        Ok(testimonials
            .into_iter()
            .map(|testimonial| TestimonialView {
                owner: testimonial
                    .owner
                    .and_then(|owner| owners.get(&owner).cloned()),
                id: testimonial.id,
                text: testimonial.text,
                name: testimonial.name,
                created_at: testimonial.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CatalogueRepositoryError, MockCatalogueRepository, MockUserRepository,
    };
    use crate::domain::{ErrorCode, Testimonial, User};
    use chrono::Utc;
    use rstest::rstest;

    fn service(
        catalogue: MockCatalogueRepository,
        users: MockUserRepository,
    ) -> CatalogueService<MockCatalogueRepository, MockUserRepository> {
        CatalogueService::new(Arc::new(catalogue), Arc::new(users))
    }

    fn testimonial(owner: Option<RecordId>) -> Testimonial {
        Testimonial {
            id: RecordId::generate(),
            text: "Lovely recipes".to_owned(),
            name: "Ann".to_owned(),
            owner,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn testimonials_populate_existing_owners_only() {
        let owner = User {
            id: RecordId::generate(),
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            avatar: Some("https://example.com/ann.png".to_owned()),
            followers: Vec::new(),
            following: Vec::new(),
        };
        let owner_id = owner.id;
        let dangling = RecordId::generate();
        let stored = vec![
            testimonial(Some(owner_id)),
            testimonial(Some(dangling)),
            testimonial(None),
        ];

        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_list_testimonials()
            .times(1)
            .return_once(move || Ok(stored));
        let mut users = MockUserRepository::new();
        users
            .expect_find_many()
            .withf(move |ids| ids.len() == 2 && ids.contains(&owner_id))
            .times(1)
            .return_once(move |_| Ok(vec![owner]));

        let views = service(catalogue, users)
            .testimonials()
            .await
            .expect("testimonials load");

        let owners: Vec<Option<RecordId>> = views
            .iter()
            .map(|view| view.owner.as_ref().map(|owner| owner.id))
            .collect();
        assert_eq!(owners, vec![Some(owner_id), None, None]);
    }

    #[rstest]
    #[tokio::test]
    async fn testimonials_without_owners_skip_user_lookup() {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_list_testimonials()
            .return_once(|| Ok(vec![testimonial(None)]));
        let users = MockUserRepository::new();

        let views = service(catalogue, users)
            .testimonials()
            .await
            .expect("testimonials load");
        assert_eq!(views.len(), 1);
        assert!(views[0].owner.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn category_lookup_returns_the_stored_record() {
        let id = RecordId::generate();
        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_categories_by_ids()
            .withf(move |ids| ids.len() == 1 && ids.first() == Some(&id))
            .times(1)
            .return_once(move |_| {
                Ok(vec![Category {
                    id,
                    name: "Dessert".to_owned(),
                }])
            });

        let category = service(catalogue, MockUserRepository::new())
            .category(id)
            .await
            .expect("category found");
        assert_eq!(category.name, "Dessert");
    }

    #[rstest]
    #[case::area(0, AREA_NOT_FOUND)]
    #[case::ingredient(1, INGREDIENT_NOT_FOUND)]
    #[case::category(2, CATEGORY_NOT_FOUND)]
    #[tokio::test]
    async fn missing_records_are_not_found(#[case] kind: u8, #[case] message: &str) {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue.expect_areas_by_ids().returning(|_| Ok(Vec::new()));
        catalogue
            .expect_ingredients_by_ids()
            .returning(|_| Ok(Vec::new()));
        catalogue
            .expect_categories_by_ids()
            .returning(|_| Ok(Vec::new()));
        let service = service(catalogue, MockUserRepository::new());
        let id = RecordId::generate();

        let err = match kind {
            0 => service.area(id).await.map(|_| ()),
            1 => service.ingredient(id).await.map(|_| ()),
            _ => service.category(id).await.map(|_| ()),
        }
        .expect_err("record missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), message);
    }

    #[rstest]
    #[case(CatalogueRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(CatalogueRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_errors_map_to_domain_codes(
        #[case] failure: CatalogueRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut catalogue = MockCatalogueRepository::new();
        catalogue
            .expect_list_categories()
            .return_once(move || Err(failure));

        let err = service(catalogue, MockUserRepository::new())
            .categories()
            .await
            .expect_err("repository fails");
        assert_eq!(err.code(), expected);
    }
}
