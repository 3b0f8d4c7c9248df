//! Render plans for public category pages.
//!
//! Each [`RenderStrategy`] turns a category, its direct children and its
//! active products into a serializable plan that a front end can draw without
//! further decisions. Strategies only read the layout fields of the category,
//! product names, prices, active flags and image references.

use serde::Serialize;

use crate::layout::{LayoutDescriptor, RenderStrategy};
use crate::media::display_url;
use crate::types::DbId;

/// Products shown in the carousel of a carousel-grid page.
pub const CAROUSEL_SIZE: usize = 8;

/// Products per lookbook section.
pub const LOOKBOOK_SECTION_SIZE: usize = 4;

/// Story cards that are repeated in the featured strip.
pub const STORY_FEATURED: usize = 6;

/// Products featured at the top of a rich-text page.
pub const RICH_TEXT_FEATURED: usize = 3;

/// Category fields a strategy may read.
#[derive(Debug, Clone)]
pub struct CategorySnapshot {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub level: i32,
    pub image_ids: Vec<String>,
    pub layout: LayoutDescriptor,
}

/// Product fields a strategy may read.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub id: DbId,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub image_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryHeader {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub level: i32,
    pub product_count: usize,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: DbId,
    pub name: String,
    pub price: f64,
    pub is_active: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryCard {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookbookSection {
    pub title: String,
    pub hero_image_url: Option<String>,
    pub products: Vec<ProductCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryCard {
    pub position: usize,
    pub product: ProductCard,
}

/// Strategy-specific body of a render plan.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RenderBody {
    Grid {
        columns: i16,
        products: Vec<ProductCard>,
    },
    BannerGrid {
        columns: i16,
        banner_url: Option<String>,
        products: Vec<ProductCard>,
    },
    Lookbook {
        sections: Vec<LookbookSection>,
    },
    Story {
        stories: Vec<StoryCard>,
        featured: Vec<ProductCard>,
    },
    CarouselGrid {
        columns: i16,
        carousel: Vec<ProductCard>,
        grid: Vec<ProductCard>,
    },
    Subcategory {
        subcategories: Vec<SubcategoryCard>,
        products: Vec<ProductCard>,
    },
    RichText {
        featured: Vec<ProductCard>,
        remaining: Vec<ProductCard>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub category: CategoryHeader,
    #[serde(flatten)]
    pub body: RenderBody,
}

/// Build the render plan for a category page.
///
/// `cloud_name` is the media account used to expand image references. Without
/// one, every image URL in the plan is `None`.
pub fn render_category(
    category: &CategorySnapshot,
    children: &[CategorySnapshot],
    products: &[ProductSnapshot],
    cloud_name: Option<&str>,
) -> RenderPlan {
    let url = |reference: Option<&String>| {
        reference
            .zip(cloud_name)
            .map(|(r, cloud)| display_url(cloud, r))
    };
    let cards: Vec<ProductCard> = products
        .iter()
        .map(|p| ProductCard {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            is_active: p.is_active,
            image_url: url(p.image_ids.first()),
        })
        .collect();

    let cover_image_url = url(category.image_ids.first());
    let header = CategoryHeader {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        level: category.level,
        product_count: products.len(),
        cover_image_url: cover_image_url.clone(),
    };

    let layout = &category.layout;
    let columns = layout.effective_columns();
    let strategy = RenderStrategy::from(layout.view_type);

    let body = match strategy {
        RenderStrategy::Grid => RenderBody::Grid {
            columns,
            products: cards,
        },
        RenderStrategy::BannerGrid => RenderBody::BannerGrid {
            columns,
            banner_url: cover_image_url,
            products: cards,
        },
        RenderStrategy::CarouselGrid => {
            let (carousel, grid) = split_at_most(cards, CAROUSEL_SIZE);
            RenderBody::CarouselGrid {
                columns,
                carousel,
                grid,
            }
        }
        RenderStrategy::Lookbook => RenderBody::Lookbook {
            sections: cards
                .chunks(LOOKBOOK_SECTION_SIZE)
                .enumerate()
                .map(|(index, chunk)| LookbookSection {
                    title: layout
                        .section_title
                        .clone()
                        .unwrap_or_else(|| format!("Collection {}", index + 1)),
                    hero_image_url: chunk.first().and_then(|c| c.image_url.clone()),
                    products: chunk.to_vec(),
                })
                .collect(),
        },
        RenderStrategy::Story => RenderBody::Story {
            featured: cards.iter().take(STORY_FEATURED).cloned().collect(),
            stories: cards
                .into_iter()
                .enumerate()
                .map(|(index, product)| StoryCard {
                    position: index + 1,
                    product,
                })
                .collect(),
        },
        RenderStrategy::Subcategory => RenderBody::Subcategory {
            subcategories: children
                .iter()
                .map(|c| SubcategoryCard {
                    id: c.id,
                    name: c.name.clone(),
                    slug: c.slug.clone(),
                    image_url: url(c.image_ids.first()),
                })
                .collect(),
            products: cards,
        },
        RenderStrategy::RichText => {
            let (featured, remaining) = split_at_most(cards, RICH_TEXT_FEATURED);
            RenderBody::RichText {
                featured,
                remaining,
            }
        }
    };

    RenderPlan {
        category: header,
        body,
    }
}

fn split_at_most<T>(mut items: Vec<T>, n: usize) -> (Vec<T>, Vec<T>) {
    let rest = items.split_off(n.min(items.len()));
    (items, rest)
}
