use std::collections::HashMap;

use crate::{
    models::{Category, ProductRecord},
    params::{ProductQuery, ProductSortBy, SortOrder},
    response::Listing,
};

/// Read-only product lookup, kept in definition order for browsing.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// The restaurant's menu.
    pub fn builtin() -> Self {
        Self::from_products(PRODUCTS.iter().map(ProductSeed::to_record))
    }

    /// Builds a catalog from `products`. A repeated id replaces the earlier
    /// record in place.
    pub fn from_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        let mut catalog = Self {
            products: Vec::new(),
            index: HashMap::new(),
        };
        for product in products {
            match catalog.index.get(&product.id) {
                Some(&pos) => catalog.products[pos] = product,
                None => {
                    catalog.index.insert(product.id.clone(), catalog.products.len());
                    catalog.products.push(product);
                }
            }
        }
        catalog
    }

    pub fn get(&self, product_id: &str) -> Option<&ProductRecord> {
        self.index.get(product_id).map(|&pos| &self.products[pos])
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.index.contains_key(product_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &ProductRecord> {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn list(&self, query: &ProductQuery) -> Listing<ProductRecord> {
        let needle = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matches: Vec<ProductRecord> = self
            .products
            .iter()
            .filter(|p| query.category.is_none_or(|c| p.category == c))
            .filter(|p| query.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| query.max_price.is_none_or(|max| p.price <= max))
            .filter(|p| match &needle {
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                }
                None => true,
            })
            .cloned()
            .collect();

        let sort_by = query.sort_by.unwrap_or(ProductSortBy::Catalog);
        let sort_order = query.sort_order.unwrap_or(SortOrder::Asc);
        match sort_by {
            ProductSortBy::Catalog => {}
            ProductSortBy::Price => matches.sort_by_key(|p| p.price),
            ProductSortBy::Name => matches.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        if let SortOrder::Desc = sort_order {
            matches.reverse();
        }

        Listing::paginate(matches, query.pagination.normalize())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    price: u64,
    category: Category,
    image: &'static str,
    description: Option<&'static str>,
}

impl ProductSeed {
    fn to_record(&self) -> ProductRecord {
        ProductRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            price: self.price,
            category: self.category,
            image: self.image.to_string(),
            description: self.description.map(str::to_string),
        }
    }
}

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        id: "dish-day-1",
        name: "Ролл \"Калифорния с крабом\"",
        price: 350,
        category: Category::ColdRolls,
        image: "../res/images/dish-of-day.jpg",
        description: None,
    },
    ProductSeed {
        id: "set1",
        name: "Сет \"Домашний\"",
        price: 1400,
        category: Category::Sets,
        image: "../res/images/set1.jpg",
        description: Some("Сет на 3 персоны. Запечёные роллы с креветкой, с куриным филе, с крабом, с лососем. Подаётся с имбирём, васаби и соевым соусом 820г."),
    },
    ProductSeed {
        id: "set2",
        name: "Сет \"Горячий\"",
        price: 1600,
        category: Category::Sets,
        image: "../res/images/set2.jpg",
        description: Some("Сет на 4 персоны. Темпура с крабом и курицей, джусто, кунашир, темпура с курицей и беконом с соусом спайси. Подаётся с соусом спайси 1000г."),
    },
    ProductSeed {
        id: "set3",
        name: "Сет \"Мини гриль\"",
        price: 1500,
        category: Category::Sets,
        image: "../res/images/set3.jpg",
        description: Some("Сет на 4 персоны. Запечёные роллы с креветкой, с лососем, йоджи кани, брюс ли. Подаётся с имбирём, васаби и соевым соусом 930г."),
    },
    ProductSeed {
        id: "set4",
        name: "Сет \"СамСам\"",
        price: 1000,
        category: Category::Sets,
        image: "../res/images/set4.jpg",
        description: Some("Сет на 2 персоны. Спайси суши с лососем, с креветкой, маки с лососем, калифорния с крабом. Подаётся с имбирём, васаби и соевым соусом 400г."),
    },
    ProductSeed {
        id: "set5",
        name: "Сет \"Мега\"",
        price: 2765,
        category: Category::Sets,
        image: "../res/images/set5.jpg",
        description: Some("Сет на 6 персон. Йоджи кани, йоджи сяке, брюс ли, инь ян, филадельфия с огурцом, калифорния с лососем, маки с креветкой, с лососем. Подаётся с имбирём, васаби и соевым соусом 1650г."),
    },
    ProductSeed {
        id: "roll1",
        name: "Ролл с Авокадо",
        price: 260,
        category: Category::ColdRolls,
        image: "../res/images/roll1.jpg",
        description: Some("110г 8 кусочков: Классический ролл с авокадо. Подается с соевым соусом, васаби и имбирём."),
    },
    ProductSeed {
        id: "roll2",
        name: "Ролл с Огурцом",
        price: 235,
        category: Category::ColdRolls,
        image: "../res/images/roll2.jpg",
        description: Some("110г 8 кусочков: Классический ролл с хрустящим огурцом. Подается с соевым соусом, васаби и имбирём."),
    },
    ProductSeed {
        id: "roll3",
        name: "Ролл с Лососем",
        price: 355,
        category: Category::ColdRolls,
        image: "../res/images/roll3.jpg",
        description: Some("110г 8 кусочков: Классический ролл с охлаждённым лососем. Подается с соевым соусом, васаби и имбирём."),
    },
    ProductSeed {
        id: "roll4",
        name: "Ролл с Тунцом",
        price: 323,
        category: Category::ColdRolls,
        image: "../res/images/roll4.jpg",
        description: Some("110г 8 кусочков: Классический ролл с тунцом. Подается с соевым соусом, васаби и имбирём."),
    },
    ProductSeed {
        id: "roll5",
        name: "Ролл с Креветкой",
        price: 307,
        category: Category::ColdRolls,
        image: "../res/images/roll5.jpg",
        description: Some("110г 8 кусочков: Классический ролл с тигровыми креветками. Подается с соевым соусом, васаби и имбирём."),
    },
    ProductSeed {
        id: "hot-roll1",
        name: "Ролл \"Ацуй\"",
        price: 565,
        category: Category::HotRolls,
        image: "../res/images/hot-roll1.jpg",
        description: Some("Темпура ролл с лососем, угрём, копчёным беконом и сыром моцарелла 200г. Подаётся с пикантным соусом спайс. Соевый соус, васаби или имбирь можно приобрести отдельно."),
    },
    ProductSeed {
        id: "hot-roll2",
        name: "Ролл \"Темпура с лососем\"",
        price: 535,
        category: Category::HotRolls,
        image: "../res/images/hot-roll2.jpg",
        description: Some("Темпура ролл с лососем, сливочным сыром, огурцом, зелёным луком и икрой масаго под ореховым соусом и унаги 230г. Подаётся с пикантным соусом спайс. Соевый соус, васаби или имбирь можно приобрести отдельно."),
    },
    ProductSeed {
        id: "hot-roll3",
        name: "Ролл \"Кунашир\"",
        price: 497,
        category: Category::HotRolls,
        image: "../res/images/hot-roll3.jpg",
        description: Some("Темпура ролл с лососем, тунцом, тигровыми креветками, кальмаром и икрой масаго 200г. Подаётся с пикантным соусом спайс. Соевый соус, васаби или имбирь можно приобрести отдельно."),
    },
    ProductSeed {
        id: "hot-roll4",
        name: "Ролл \"Темпура краш\"",
        price: 487,
        category: Category::HotRolls,
        image: "../res/images/hot-roll4.jpg",
        description: Some("Темпура ролл с овощами и сливочным сыром под шапкой из крабового тартара, лука фри и зелёного лука с сырным соусом и унаги 300г. Подаётся с пикантным соусом спайс. Соевый соус, васаби или имбирь можно приобрести отдельно."),
    },
    ProductSeed {
        id: "hot-roll5",
        name: "Ролл \"Горячий цезарь\"",
        price: 425,
        category: Category::HotRolls,
        image: "../res/images/hot-roll5.jpg",
        description: Some("Темпура ролл с куриным филе, томатом, листьями салата и соусом цезарь 200г. Подаётся с пикантным соусом спайс. Соевый соус, васаби или имбирь можно приобрести отдельно."),
    },
    ProductSeed {
        id: "pizza1",
        name: "Пицца \"Маргарита\"",
        price: 740,
        category: Category::Pizza,
        image: "../res/images/pizza1.jpg",
        description: Some("Увеличенная порция моцареллы, томаты, итальянские травы, фирменный томатный соус. 30 см, 590 г."),
    },
    ProductSeed {
        id: "pizza2",
        name: "Пицца \"Пепперони\"",
        price: 750,
        category: Category::Pizza,
        image: "../res/images/pizza2.jpg",
        description: Some("Пикантная пепперони, увеличенная порция моцареллы, фирменный томатный соус. 30 см, 550 г."),
    },
    ProductSeed {
        id: "pizza3",
        name: "Пицца \"Карбонара\"",
        price: 919,
        category: Category::Pizza,
        image: "../res/images/pizza3.jpg",
        description: Some("Бекон, сыры чеддер и пармезан, моцарелла, томаты, красный лук, чеснок, фирменный соус альфредо, итальянские травы. 30 см, 590 г."),
    },
    ProductSeed {
        id: "pizza4",
        name: "Пицца \"Песто\"",
        price: 819,
        category: Category::Pizza,
        image: "../res/images/pizza4.jpg",
        description: Some("Цыпленок, соус песто, кубики брынзы, томаты, моцарелла, фирменный соус альфредо. 30 см, 610 г."),
    },
    ProductSeed {
        id: "pizza5",
        name: "Пицца \"Сырный цыпленок\"",
        price: 839,
        category: Category::Pizza,
        image: "../res/images/pizza5.jpg",
        description: Some("Цыпленок, моцарелла, сыры чеддер и пармезан, сырный соус, томаты, фирменный соус альфредо, чеснок. 30 см, 620 г."),
    },
    ProductSeed {
        id: "poke1",
        name: "Поке с тигровыми креветками и битыми огурцами",
        price: 490,
        category: Category::Poke,
        image: "../res/images/poke1.jpg",
        description: Some("Поке с натуральным соусом, сочными тигровыми креветками и полезным салатом чука, пряными битыми огурцами, душистым корнем имбиря и свежими помидорами черри."),
    },
    ProductSeed {
        id: "poke2",
        name: "Поке с тигровыми креветками и командорским кальмаром",
        price: 540,
        category: Category::Poke,
        image: "../res/images/poke2.jpg",
        description: Some("Поке с натуральным соусом, тигровыми креветками и командорским кальмаром, пряными битыми огурцами, душистым корнем имбиря, свежими помидорами черри."),
    },
    ProductSeed {
        id: "hot1",
        name: "Торидон",
        price: 453,
        category: Category::Hot,
        image: "../res/images/hot1.jpg",
        description: Some("295г Маринованный цыплёнок в хрустящей панировке, подаётся на рисе с салатом айсберг, эдамамэ, нори и соусом терияки, соусом чиммай и соусом сладкий чили."),
    },
    ProductSeed {
        id: "hot2",
        name: "Гёдза с креветкой 6 шт.",
        price: 513,
        category: Category::Hot,
        image: "../res/images/hot2.jpg",
        description: Some("100/30г Японские пельмени с тигровыми креветками, капустой, кунжутным маслом и свежей зеленью, под фирменным соусом никкей с долькой лимона."),
    },
    ProductSeed {
        id: "hot3",
        name: "Томагояки",
        price: 453,
        category: Category::Hot,
        image: "../res/images/hot3.jpg",
        description: Some("290г Блюдо на каждый день, в котором поджаренная куриная грудка с рисом, болтуньей, салатом айсберг и хрустящим луком фри, заправлены соусом унаги и ореховым соусом, а зелёный лук, томаты черри, кунжут и фирменный соус гармонично дополняют вкус блюда."),
    },
    ProductSeed {
        id: "dessert1",
        name: "Чизкейк Нью-Йорк",
        price: 295,
        category: Category::Dessert,
        image: "../res/images/dessert1.jpg",
        description: Some("Чизкейк нью-йорк с топпингом на выбор 125г."),
    },
    ProductSeed {
        id: "dessert2",
        name: "Карамельный чизкейк",
        price: 350,
        category: Category::Dessert,
        image: "../res/images/dessert2.jpg",
        description: Some("Сливочный десерт с очень карамельной начинкой, шоколадным печеньем и орехами, 100 г."),
    },
    ProductSeed {
        id: "drink1",
        name: "Сок Rich Вишня",
        price: 200,
        category: Category::Drinks,
        image: "../res/images/drink1.jpg",
        description: Some("Сок Рич 200мл на выбор."),
    },
    ProductSeed {
        id: "drink2",
        name: "Сок Rich Персик",
        price: 200,
        category: Category::Drinks,
        image: "../res/images/drink2.jpg",
        description: Some("Сок Рич 200мл на выбор."),
    },
    ProductSeed {
        id: "drink3",
        name: "Сок Rich Яблоко",
        price: 200,
        category: Category::Drinks,
        image: "../res/images/drink3.jpg",
        description: Some("Сок Рич 200мл на выбор."),
    },
    ProductSeed {
        id: "drink4",
        name: "Сок Rich Апельсин",
        price: 200,
        category: Category::Drinks,
        image: "../res/images/drink4.jpg",
        description: Some("Сок Рич 200мл на выбор."),
    },
];
